//! Push notification traits.

use vivo_core::{
    BroadcastRequest, DeliveryReport, PushRequest, StatisticsEvent, StatisticsReport, TaskIds,
    TransportError,
};

use crate::GatewayCall;

/// Executes gateway HTTP calls.
#[trait_variant::make(Send)]
pub trait Transport: Send + Sync {
    /// Send a call and return the decoded JSON body.
    async fn execute(&self, call: GatewayCall) -> Result<serde_json::Value, TransportError>;
}

/// High-level push sender.
#[trait_variant::make(Send)]
pub trait Pusher: Send + Sync {
    /// Push to an explicit list of registration IDs.
    async fn push(&self, request: PushRequest) -> DeliveryReport;

    /// Push to the whole audience.
    async fn push_all(&self, request: BroadcastRequest) -> DeliveryReport;
}

/// Source of delivery statistics.
#[trait_variant::make(Send)]
pub trait StatisticsProvider: Send + Sync {
    /// Aggregate statistics for the given tasks.
    async fn statistics(
        &self,
        task_ids: TaskIds,
        subscriber: Option<tokio::sync::mpsc::UnboundedSender<StatisticsEvent>>,
    ) -> StatisticsReport;
}
