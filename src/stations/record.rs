// ABOUTME: Station record as delivered by the station data endpoint
// ABOUTME: Coordinates stay raw JSON; unmapped stations are filtered at render time

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geo::LatLng;

/// Publication status of a station. The wire values are German.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum StationStatus {
    #[default]
    Active,
    Inactive,
    /// Station run by the partner organisation (NABU).
    Partner,
}

impl From<Option<String>> for StationStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("inaktiv") => StationStatus::Inactive,
            Some("nabu") => StationStatus::Partner,
            _ => StationStatus::Active,
        }
    }
}

impl From<StationStatus> for String {
    fn from(status: StationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::Active => "aktiv",
            StationStatus::Inactive => "inaktiv",
            StationStatus::Partner => "nabu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, rename = "plz", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Number, numeric string or null on the wire.
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Backend fields this client does not interpret, kept for export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a coordinate the way a lenient float parser would: numbers as-is,
/// strings trimmed and parsed, everything else (and NaN/inf) rejected.
pub fn parse_coordinate(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

impl StationRecord {
    /// Position on the map, or `None` when the station is unmapped.
    ///
    /// A zero latitude or longitude counts as unmapped.
    pub fn position(&self) -> Option<LatLng> {
        let lat = parse_coordinate(&self.latitude)?;
        let lng = parse_coordinate(&self.longitude)?;
        if lat == 0.0 || lng == 0.0 {
            return None;
        }
        Some(LatLng::new(lat, lng))
    }

    pub fn is_mapped(&self) -> bool {
        self.position().is_some()
    }

    /// Identity used for highlighting markers that belong to search hits.
    pub fn highlight_key(&self) -> String {
        format!("{}:{}", self.name, self.postal_code.as_deref().unwrap_or(""))
    }

    pub fn postal_code(&self) -> &str {
        self.postal_code.as_deref().unwrap_or("")
    }
}
