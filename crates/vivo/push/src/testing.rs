//! In-memory transport for tests.

use std::sync::Mutex;

use vivo_core::{Credentials, GatewayConfig, TransportError};

use crate::{GatewayCall, Transport};

type Handler = Box<dyn Fn(&GatewayCall) -> Result<serde_json::Value, TransportError> + Send + Sync>;

/// Answers every call with a handler and records what was sent.
pub(crate) struct ScriptedTransport {
    handler: Handler,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedTransport {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&GatewayCall) -> Result<serde_json::Value, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls_to(&self, url: &str) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.url == url)
            .cloned()
            .collect()
    }

    pub(crate) fn count(&self, url: &str) -> usize {
        self.calls_to(url).len()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, call: GatewayCall) -> Result<serde_json::Value, TransportError> {
        self.calls.lock().unwrap().push(call.clone());
        (self.handler)(&call)
    }
}

pub(crate) const TEST_TOKEN: &str = "test-auth-token";

pub(crate) fn test_config(max_length: usize, statistic_max_num: usize) -> GatewayConfig {
    GatewayConfig::builder(Credentials::new("1001", "app-key", "app-secret"))
        .max_length(max_length)
        .statistic_max_num(statistic_max_num)
        .build()
        .unwrap()
}

/// Successful auth response.
pub(crate) fn auth_ok() -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::json!({"result": 0, "desc": "ok", "authToken": TEST_TOKEN}))
}

/// Registration IDs carried by a bulk send body.
pub(crate) fn reg_ids(call: &GatewayCall) -> Vec<String> {
    call.body
        .as_ref()
        .and_then(|body| body["regIds"].as_array().cloned())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| id.as_str().map(str::to_string))
        .collect()
}

pub(crate) fn recipients(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("reg-{}", i)).collect()
}
