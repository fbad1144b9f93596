//! Delivery statistics types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::PushError;

/// Counters reported by the statistics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryStatistics {
    #[serde(deserialize_with = "count")]
    pub send: u64,
    #[serde(deserialize_with = "count")]
    pub receive: u64,
    #[serde(deserialize_with = "count")]
    pub display: u64,
    #[serde(deserialize_with = "count")]
    pub click: u64,
    #[serde(deserialize_with = "count")]
    pub target_invalid: u64,
    #[serde(deserialize_with = "count")]
    pub target_un_sub: u64,
    #[serde(deserialize_with = "count")]
    pub target_in_active: u64,
    #[serde(deserialize_with = "count")]
    pub covered: u64,
    #[serde(deserialize_with = "count")]
    pub controlled: u64,
    #[serde(deserialize_with = "count")]
    pub target_offline: u64,
}

impl std::ops::AddAssign<&DeliveryStatistics> for DeliveryStatistics {
    fn add_assign(&mut self, other: &DeliveryStatistics) {
        self.send = self.send.saturating_add(other.send);
        self.receive = self.receive.saturating_add(other.receive);
        self.display = self.display.saturating_add(other.display);
        self.click = self.click.saturating_add(other.click);
        self.target_invalid = self.target_invalid.saturating_add(other.target_invalid);
        self.target_un_sub = self.target_un_sub.saturating_add(other.target_un_sub);
        self.target_in_active = self.target_in_active.saturating_add(other.target_in_active);
        self.covered = self.covered.saturating_add(other.covered);
        self.controlled = self.controlled.saturating_add(other.controlled);
        self.target_offline = self.target_offline.saturating_add(other.target_offline);
    }
}

// Counters arrive as numbers, numeric strings or null.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Statistics for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticRecord {
    #[serde(default, deserialize_with = "crate::wire::string_or_number")]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub counts: DeliveryStatistics,
}

/// Normalized list of task IDs to query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskIds(Vec<String>);

impl TaskIds {
    /// Normalize a JSON value: a comma-joined string or an array of strings.
    ///
    /// Blank and non-string array entries are dropped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PushError> {
        match value {
            serde_json::Value::String(s) => Ok(Self::from(s.as_str())),
            serde_json::Value::Array(items) => Ok(items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect()),
            other => Err(PushError::InvalidInput(format!(
                "task IDs must be a string or an array of strings, got {}",
                other
            ))),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TaskIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|id| id.as_ref().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        )
    }
}

impl From<&str> for TaskIds {
    fn from(joined: &str) -> Self {
        joined.split(',').collect()
    }
}

impl From<Vec<String>> for TaskIds {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<&[&str]> for TaskIds {
    fn from(ids: &[&str]) -> Self {
        ids.iter().collect()
    }
}

/// A statistics page that could not be added to the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Zero-based page index.
    pub page: usize,
    pub task_ids: Vec<String>,
    pub error: PushError,
}

/// Aggregated statistics over every queried page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub totals: DeliveryStatistics,
    /// Per-task records from the pages that succeeded.
    pub tasks: Vec<StatisticRecord>,
    pub page_count: usize,
    #[serde(skip)]
    pub failures: Vec<PageFailure>,
}

/// Progress notifications for a statistics query.
#[derive(Debug, Clone)]
pub enum StatisticsEvent {
    PageFailed(PageFailure),
    Finished(StatisticsReport),
}
