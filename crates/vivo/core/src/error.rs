//! Error types.

use thiserror::Error;

/// Configuration problems, raised before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("vivo {0} must not be empty")]
    MissingCredential(&'static str),
    #[error("{0} must not be empty")]
    MissingUrl(&'static str),
    #[error("{name} must be within 1..={max}, got {value}")]
    LimitOutOfRange {
        name: &'static str,
        value: usize,
        max: usize,
    },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failures of the HTTP collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("gateway returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("unreadable response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Errors surfaced by gateway operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("gateway rejected request (result {code}): {desc}")]
    Vendor { code: String, desc: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to decode gateway response: {0}")]
    Decode(String),
    #[error("batch task aborted: {0}")]
    Aborted(String),
}

impl From<serde_json::Error> for PushError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
