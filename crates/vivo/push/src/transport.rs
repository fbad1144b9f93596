//! HTTP transport for gateway calls.

use std::time::Duration;

use vivo_core::{ConfigError, TransportError};

use crate::Transport;

/// Header carrying the auth token on every call except auth itself.
pub const AUTH_TOKEN_HEADER: &str = "authToken";

/// HTTP method of a gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One request to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayCall {
    pub method: Method,
    pub url: String,
    pub auth_token: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl GatewayCall {
    /// JSON POST.
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            auth_token: None,
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// GET without a body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            auth_token: None,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Look up a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, call: GatewayCall) -> Result<serde_json::Value, TransportError> {
        let mut request = match call.method {
            Method::Get => self.client.get(&call.url),
            Method::Post => self.client.post(&call.url),
        };

        request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = &call.auth_token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| request_error(&call.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: call.url,
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::Body {
                url: call.url.clone(),
                message: e.to_string(),
            })
    }
}

fn request_error(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
