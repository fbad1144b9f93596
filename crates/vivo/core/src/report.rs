//! Delivery reports and events.

use serde::Serialize;

use crate::{GatewayReply, PushError};

/// Which delivery path handled a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Single,
    Bulk,
    Broadcast,
}

/// Overall outcome of a delivery call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Every send that could be attempted was attempted.
    Completed,
    /// Authentication or message save failed; nothing was sent.
    Aborted,
}

/// Why part of a delivery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    Error(PushError),
    /// Recipients rejected by the gateway inside an otherwise successful batch.
    InvalidRecipients(Vec<String>),
}

/// Notifications emitted while a delivery runs.
#[derive(Debug, Clone)]
pub enum DeliveryEvent {
    /// One gateway call succeeded.
    Success(GatewayReply),
    /// One gateway call failed, or reported invalid recipients.
    Failure(DeliveryFailure),
    /// Terminal event, sent exactly once.
    Finished(DeliveryReport),
}

/// Final result of a delivery call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    pub status: DeliveryStatus,
    pub route: Route,
    pub max_length: usize,
    /// Number of gateway send calls made, not the number of planned batches.
    /// Zero when a bulk push aborts before dispatch.
    pub batch_count: usize,
    pub success_total: u64,
    pub fail_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Success and failure events, in the order they were observed.
    #[serde(skip)]
    pub events: Vec<DeliveryEvent>,
}

impl DeliveryReport {
    /// An empty, completed report.
    pub fn new(route: Route, max_length: usize) -> Self {
        Self {
            status: DeliveryStatus::Completed,
            route,
            max_length,
            batch_count: 0,
            success_total: 0,
            fail_total: 0,
            task_id: None,
            events: Vec::new(),
        }
    }

    /// Failure events only.
    pub fn failures(&self) -> impl Iterator<Item = &DeliveryFailure> {
        self.events.iter().filter_map(|event| match event {
            DeliveryEvent::Failure(failure) => Some(failure),
            _ => None,
        })
    }

    /// Successful gateway replies only.
    pub fn successes(&self) -> impl Iterator<Item = &GatewayReply> {
        self.events.iter().filter_map(|event| match event {
            DeliveryEvent::Success(reply) => Some(reply),
            _ => None,
        })
    }
}
