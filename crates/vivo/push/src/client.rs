//! Client facade over routing and statistics.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use vivo_core::{
    BroadcastRequest, ConfigError, DeliveryReport, GatewayConfig, PushError, PushRequest,
    StatisticsEvent, StatisticsReport, TaskIds,
};

use crate::gateway::Gateway;
use crate::{
    DeliveryRouter, Pusher, ReqwestTransport, StatisticsAggregator, StatisticsProvider, Transport,
};

/// Vivo push client for one application.
///
/// Cheap to clone; clones share the token cache.
pub struct VivoClient<T = ReqwestTransport> {
    router: DeliveryRouter<T>,
    statistics: StatisticsAggregator<T>,
    gateway: Arc<Gateway<T>>,
}

impl<T> Clone for VivoClient<T> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            statistics: self.statistics.clone(),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl VivoClient<ReqwestTransport> {
    /// Create a client using `reqwest` with the configured request timeout.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport + 'static> VivoClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: GatewayConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;

        tracing::debug!(app_id = %config.credentials.app_id, "vivo client created");

        let gateway = Arc::new(Gateway::new(config, transport));
        Ok(Self {
            router: DeliveryRouter::new(Arc::clone(&gateway)),
            statistics: StatisticsAggregator::new(Arc::clone(&gateway)),
            gateway,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.gateway.config
    }

    pub fn transport(&self) -> &T {
        &self.gateway.transport
    }

    pub fn router(&self) -> &DeliveryRouter<T> {
        &self.router
    }

    pub fn aggregator(&self) -> &StatisticsAggregator<T> {
        &self.statistics
    }

    /// See [`DeliveryRouter::deliver`].
    pub async fn deliver(&self, request: PushRequest) -> DeliveryReport {
        self.router.deliver(request).await
    }

    /// See [`DeliveryRouter::broadcast`].
    pub async fn broadcast(&self, request: BroadcastRequest) -> DeliveryReport {
        self.router.broadcast(request).await
    }

    /// See [`StatisticsAggregator::get_statistics`].
    pub async fn get_statistics(&self, task_ids: impl Into<TaskIds>) -> StatisticsReport {
        self.statistics.get_statistics(task_ids.into(), None).await
    }

    /// See [`StatisticsAggregator::get_statistics_json`].
    pub async fn get_statistics_json(
        &self,
        task_ids: &serde_json::Value,
    ) -> Result<StatisticsReport, PushError> {
        self.statistics.get_statistics_json(task_ids).await
    }
}

impl<T: Transport + 'static> Pusher for VivoClient<T> {
    async fn push(&self, request: PushRequest) -> DeliveryReport {
        self.deliver(request).await
    }

    async fn push_all(&self, request: BroadcastRequest) -> DeliveryReport {
        self.broadcast(request).await
    }
}

impl<T: Transport + 'static> StatisticsProvider for VivoClient<T> {
    async fn statistics(
        &self,
        task_ids: TaskIds,
        subscriber: Option<UnboundedSender<StatisticsEvent>>,
    ) -> StatisticsReport {
        self.statistics.get_statistics(task_ids, subscriber).await
    }
}

#[cfg(test)]
mod tests {
    use vivo_core::{Credentials, DeliveryStatus, Payload};

    use super::*;
    use crate::testing::{ScriptedTransport, auth_ok, recipients, test_config};

    fn handler(call: &crate::GatewayCall) -> Result<serde_json::Value, vivo_core::TransportError> {
        if call.url.ends_with("/auth") {
            auth_ok()
        } else if call.url.ends_with("/getStatistics") {
            Ok(serde_json::json!({"result": "0", "statistics": [{"taskId": "t", "send": 3}]}))
        } else {
            Ok(serde_json::json!({"result": 0, "taskId": "t"}))
        }
    }

    async fn push_through<P: Pusher>(pusher: &P, n: usize) -> DeliveryReport {
        pusher
            .push(PushRequest::new(recipients(n), Payload::new().with("title", "t")))
            .await
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = test_config(10, 10);
        config.max_length = 5000;
        let err = VivoClient::with_transport(config, ScriptedTransport::new(handler))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::LimitOutOfRange { .. }));

        let mut config = test_config(10, 10);
        config.credentials = Credentials::new("1001", "", "secret");
        assert!(VivoClient::with_transport(config, ScriptedTransport::new(handler)).is_err());
    }

    #[tokio::test]
    async fn test_clones_share_token_cache() {
        let client =
            VivoClient::with_transport(test_config(2, 10), ScriptedTransport::new(handler)).unwrap();
        let other = client.clone();

        let first = push_through(&client, 1).await;
        let second = push_through(&other, 1).await;

        assert_eq!(first.status, DeliveryStatus::Completed);
        assert_eq!(second.success_total, 1);
        assert_eq!(client.transport().count(&client.config().get_token_url), 1);
    }

    #[tokio::test]
    async fn test_statistics_provider() {
        let client =
            VivoClient::with_transport(test_config(2, 10), ScriptedTransport::new(handler)).unwrap();

        let report = client.statistics(TaskIds::from("t"), None).await;
        assert_eq!(report.totals.send, 3);

        let report = client.get_statistics("t,u").await;
        assert_eq!(report.totals.send, 3);
    }
}
