//! Auth token cache.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use vivo_core::{AuthReply, PushError, Reply as _, TokenPurpose};
use vivo_crypto::Signer;

use crate::{GatewayCall, Transport};

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Per-purpose auth token store.
///
/// Expiry is checked on read. Each purpose has its own lock, held across a
/// refetch, so concurrent misses for one purpose authenticate only once.
pub struct TokenCache {
    signer: Signer,
    auth_url: String,
    ttl: Duration,
    slots: [Mutex<Option<CachedToken>>; 4],
}

impl TokenCache {
    pub fn new(signer: Signer, auth_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            signer,
            auth_url: auth_url.into(),
            ttl,
            slots: std::array::from_fn(|_| Mutex::new(None)),
        }
    }

    /// Return a valid token for `purpose`, authenticating if needed.
    pub async fn get_token<T: Transport>(
        &self,
        purpose: TokenPurpose,
        transport: &T,
    ) -> Result<String, PushError> {
        let mut slot = self.slots[purpose.index()].lock().await;

        if let Some(token) = slot.as_ref().filter(|t| t.is_valid_at(Instant::now())) {
            tracing::debug!(%purpose, "auth token cache hit");
            return Ok(token.value.clone());
        }

        tracing::debug!(%purpose, "requesting auth token");
        let value = self.authenticate(transport).await?;

        *slot = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        Ok(value)
    }

    /// Drop the cached token for `purpose`.
    pub async fn invalidate(&self, purpose: TokenPurpose) {
        *self.slots[purpose.index()].lock().await = None;
    }

    async fn authenticate<T: Transport>(&self, transport: &T) -> Result<String, PushError> {
        let request = self.signer.auth_request_now();
        let call = GatewayCall::post(&self.auth_url, vivo_core::to_body(&request)?);

        let raw = transport.execute(call).await?;
        let reply: AuthReply = vivo_core::from_body(raw)?;

        let reply = reply.into_checked().map_err(|e| match e {
            PushError::Vendor { code, desc } if desc.is_empty() => {
                PushError::Auth(format!("result {}", code))
            }
            PushError::Vendor { desc, .. } => PushError::Auth(desc),
            other => other,
        })?;

        match reply.auth_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(PushError::Auth("response carried no authToken".to_string())),
        }
    }
}
