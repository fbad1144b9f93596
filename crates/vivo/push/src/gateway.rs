//! Authenticated gateway calls shared by the router and the statistics aggregator.

use vivo_core::{GatewayConfig, PushError, Reply, TokenPurpose};
use vivo_crypto::Signer;

use crate::{GatewayCall, TokenCache, Transport};

/// Config, transport and token cache of one vivo application.
pub(crate) struct Gateway<T> {
    pub(crate) config: GatewayConfig,
    pub(crate) transport: T,
    tokens: TokenCache,
}

impl<T: Transport> Gateway<T> {
    pub(crate) fn new(config: GatewayConfig, transport: T) -> Self {
        let tokens = TokenCache::new(
            Signer::new(config.credentials.clone()),
            config.get_token_url.clone(),
            config.token_lifetime(),
        );

        Self {
            config,
            transport,
            tokens,
        }
    }

    /// Auth token for `purpose`.
    pub(crate) async fn authorize(&self, purpose: TokenPurpose) -> Result<String, PushError> {
        self.tokens.get_token(purpose, &self.transport).await
    }

    /// Send `call` with `token` and decode a successful reply.
    pub(crate) async fn execute<R>(&self, call: GatewayCall, token: &str) -> Result<R, PushError>
    where
        R: Reply + serde::de::DeserializeOwned,
    {
        let raw = self
            .transport
            .execute(call.with_auth_token(token))
            .await?;
        let reply: R = vivo_core::from_body(raw)?;
        reply.into_checked()
    }
}
