//! Gateway request and response contracts.
//!
//! Only the fields the delivery core reads or writes are modelled; anything else
//! the gateway returns is ignored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{PushError, StatisticRecord};

/// Gateway result code. The push endpoints answer with numbers, the report
/// endpoint with numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultCode {
    Number(i64),
    Text(String),
}

impl ResultCode {
    /// `0` (or `"0"`) means success.
    pub fn is_success(&self) -> bool {
        match self {
            ResultCode::Number(n) => *n == 0,
            ResultCode::Text(s) => s.trim() == "0",
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultCode::Number(n) => write!(f, "{}", n),
            ResultCode::Text(s) => f.write_str(s),
        }
    }
}

/// A decoded gateway response carrying a result code.
pub trait Reply: Sized {
    fn result(&self) -> &ResultCode;

    fn desc(&self) -> Option<&str>;

    /// Turn a non-success result code into [`PushError::Vendor`].
    fn into_checked(self) -> Result<Self, PushError> {
        if self.result().is_success() {
            return Ok(self);
        }
        Err(PushError::Vendor {
            code: self.result().to_string(),
            desc: self.desc().unwrap_or_default().to_string(),
        })
    }
}

/// Authentication request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub app_id: String,
    pub app_key: String,
    pub sign: String,
    pub timestamp: i64,
}

/// Authentication response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthReply {
    pub result: ResultCode,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Reply for AuthReply {
    fn result(&self) -> &ResultCode {
        &self.result
    }

    fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

/// Response of the save-message, send, bulk-send and broadcast endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReply {
    pub result: ResultCode,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub invalid_users: Option<Vec<InvalidUser>>,
}

impl GatewayReply {
    /// Recipients the gateway refused in a bulk send.
    pub fn invalid_users(&self) -> &[InvalidUser] {
        self.invalid_users.as_deref().unwrap_or_default()
    }
}

impl Reply for GatewayReply {
    fn result(&self) -> &ResultCode {
        &self.result
    }

    fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

/// A recipient rejected by the bulk endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvalidUser {
    Detailed {
        userid: String,
        #[serde(default)]
        status: Option<i64>,
    },
    Id(String),
}

impl InvalidUser {
    pub fn reg_id(&self) -> &str {
        match self {
            InvalidUser::Detailed { userid, .. } => userid,
            InvalidUser::Id(id) => id,
        }
    }
}

/// Bulk send body for one batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSendRequest {
    pub task_id: String,
    pub reg_ids: Vec<String>,
    pub request_id: String,
}

/// Statistics response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsReply {
    pub result: ResultCode,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub statistics: Vec<StatisticRecord>,
}

impl Reply for StatisticsReply {
    fn result(&self) -> &ResultCode {
        &self.result
    }

    fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

/// Generate a fresh request identifier.
pub fn request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Serialize a request body.
pub fn to_body<S: Serialize>(value: &S) -> Result<serde_json::Value, PushError> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a response body.
pub fn from_body<R: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<R, PushError> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_forms() {
        let numeric: GatewayReply = from_body(serde_json::json!({"result": 0})).unwrap();
        assert!(numeric.result.is_success());

        let text: StatisticsReply =
            from_body(serde_json::json!({"result": "0", "statistics": []})).unwrap();
        assert!(text.result.is_success());

        let failed: GatewayReply =
            from_body(serde_json::json!({"result": 10054, "desc": "bad sign"})).unwrap();
        assert_eq!(
            failed.into_checked().unwrap_err(),
            PushError::Vendor {
                code: "10054".to_string(),
                desc: "bad sign".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_users_shapes() {
        let reply: GatewayReply = from_body(serde_json::json!({
            "result": 0,
            "taskId": 123456,
            "invalidUsers": [{"status": 1, "userid": "reg-a"}, "reg-b"]
        }))
        .unwrap();

        assert_eq!(reply.task_id.as_deref(), Some("123456"));
        let ids: Vec<&str> = reply.invalid_users().iter().map(|u| u.reg_id()).collect();
        assert_eq!(ids, ["reg-a", "reg-b"]);

        let none: GatewayReply =
            from_body(serde_json::json!({"result": 0, "invalidUsers": null})).unwrap();
        assert!(none.invalid_users().is_empty());
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(request_id(), request_id());
    }
}
