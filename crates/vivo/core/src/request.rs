//! Push request types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::DeliveryEvent;

/// Message attributes forwarded to the gateway as-is (`title`, `content`,
/// `notifyType`, `skipType`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(serde_json::Map<String, serde_json::Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Build a request body from a copy of the payload plus `extra` fields.
    ///
    /// `extra` wins over payload attributes with the same key.
    pub fn to_body_with<'a, I>(&self, extra: I) -> serde_json::Value
    where
        I: IntoIterator<Item = (&'a str, serde_json::Value)>,
    {
        let mut body = self.0.clone();
        for (key, value) in extra {
            body.insert(key.to_string(), value);
        }
        serde_json::Value::Object(body)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Payload {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// A push to an explicit list of registration IDs.
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// Registration IDs, in dispatch order.
    pub recipients: Vec<String>,
    pub payload: Payload,
    /// Delay between starting consecutive batches.
    pub pacing: Duration,
    /// Receives events as they happen.
    pub subscriber: Option<UnboundedSender<DeliveryEvent>>,
}

impl PushRequest {
    pub fn new(recipients: Vec<String>, payload: Payload) -> Self {
        Self {
            recipients,
            payload,
            pacing: Duration::ZERO,
            subscriber: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_subscriber(mut self, subscriber: UnboundedSender<DeliveryEvent>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }
}

/// A push to the application's entire audience.
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub payload: Payload,
    pub subscriber: Option<UnboundedSender<DeliveryEvent>>,
}

impl BroadcastRequest {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            subscriber: None,
        }
    }

    pub fn with_subscriber(mut self, subscriber: UnboundedSender<DeliveryEvent>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }
}
