//! On-disk cassette format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session: every port interaction in call order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Recorded interactions.
    pub interactions: Vec<Interaction>,
}

/// One call through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number within the cassette.
    pub seq: u64,
    /// Port name, e.g. `"vision_namer"`.
    pub port: String,
    /// Method name, e.g. `"suggest_name"`.
    pub method: String,
    /// Serialized request.
    pub input: serde_json::Value,
    /// Serialized `Ok`/`Err` result.
    pub output: serde_json::Value,
    /// Wall-clock duration of the live call, replayed as a delay.
    #[serde(default)]
    pub elapsed_ms: u64,
}
