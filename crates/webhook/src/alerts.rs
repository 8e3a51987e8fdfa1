//! Alert payload parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Alert timestamp, either epoch seconds or an ISO-8601 instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertTimestamp {
    Epoch(i64),
    Text(String),
}

impl fmt::Display for AlertTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTimestamp::Epoch(secs) => write!(f, "{}", secs),
            AlertTimestamp::Text(s) => f.write_str(s),
        }
    }
}

/// K-line alert as delivered in the webhook body
///
/// Every field is optional so that partial payloads can still be
/// inspected after verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPayload {
    pub id: Option<String>,
    pub symbol: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub strength: Option<f64>,
    pub ts: Option<AlertTimestamp>,
}

impl AlertPayload {
    /// Parse an alert from the raw request body
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        debug!("Parsing alert payload ({} bytes)", body.len());
        serde_json::from_slice(body)
    }
}
