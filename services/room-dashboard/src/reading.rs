//! Reading rows as delivered by the backend
//!
//! A [`Reading`] is one sensor/occupancy observation for a room and a single
//! datapoint. Rows are validated when they enter the process: the key fields
//! must be present, everything else falls back to a default, and unknown
//! columns are carried through untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::DashboardError;

/// Severity classification of a reading
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
    /// Any status string the dashboard has no color for, kept verbatim
    Other(String),
}

impl HealthStatus {
    /// The wire form of the status
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
            HealthStatus::Other(s) => s,
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        HealthStatus::Other(String::new())
    }
}

impl From<&str> for HealthStatus {
    fn from(s: &str) -> Self {
        match s {
            "healthy" => HealthStatus::Healthy,
            "warning" => HealthStatus::Warning,
            "critical" => HealthStatus::Critical,
            other => HealthStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HealthStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HealthStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(HealthStatus::from).unwrap_or_default())
    }
}

/// Composite identity of a reading: one entry per room and datapoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadingKey {
    pub room_id: String,
    pub datapoint: String,
}

impl ReadingKey {
    pub fn new(room_id: impl Into<String>, datapoint: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            datapoint: datapoint.into(),
        }
    }
}

impl fmt::Display for ReadingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.room_id, self.datapoint)
    }
}

/// The latest known observation for one room and datapoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(deserialize_with = "deserialize_room_id")]
    pub room_id: String,
    pub datapoint: String,
    #[serde(default)]
    pub health_status: HealthStatus,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_occupied: bool,
    /// Backend columns the dashboard does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reading {
    pub fn new(
        room_id: impl Into<String>,
        datapoint: impl Into<String>,
        health_status: HealthStatus,
        is_occupied: bool,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            datapoint: datapoint.into(),
            health_status,
            is_occupied,
            extra: Map::new(),
        }
    }

    /// Validate a raw backend row
    ///
    /// Rejects anything that is not an object or lacks `room_id`/`datapoint`.
    pub fn from_row(row: Value) -> crate::Result<Self> {
        if !row.is_object() {
            return Err(DashboardError::InvalidRow(format!(
                "expected an object, got {}",
                row
            )));
        }
        serde_json::from_value(row).map_err(|e| DashboardError::InvalidRow(e.to_string()))
    }

    pub fn key(&self) -> ReadingKey {
        ReadingKey::new(self.room_id.clone(), self.datapoint.clone())
    }

    pub fn occupancy_label(&self) -> &'static str {
        if self.is_occupied {
            "Occupied"
        } else {
            "Vacant"
        }
    }
}

fn deserialize_room_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "room_id must be a string or number, got {}",
            other
        ))),
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
