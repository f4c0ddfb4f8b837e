// ABOUTME: Wire models for the region backfill status and control endpoints
// ABOUTME: Lenient deserialisation; missing fields fall back to falsy defaults

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::stations::StationRecord;

/// Snapshot of the backfill job at one poll instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressResponse {
    #[serde(deserialize_with = "task_id")]
    pub task_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub finished: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub stale: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub processed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub success: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub errors: u64,
    pub eta_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub started: bool,
    #[serde(deserialize_with = "task_id")]
    pub task_id: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbortResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub aborted: bool,
    pub reason: Option<String>,
}

/// Result of a conditional station fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum StationFetch {
    Modified {
        stations: Vec<StationRecord>,
        etag: Option<String>,
    },
    NotModified,
}

/// Task ids arrive as integers or strings; 0, "" and null all mean "no task".
fn task_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
