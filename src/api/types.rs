//! API request and response types

use crate::dialogue::TurnData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One assistant turn: an utterance against a session.
#[derive(Debug, Deserialize)]
pub struct AssistantQueryRequest {
    /// Absent means the single implicit legacy session.
    #[serde(default)]
    pub session_key: Option<String>,
    pub utterance: String,
}

/// Reply text plus the structured per-stage payload.
#[derive(Debug, Serialize)]
pub struct AssistantQueryResponse {
    pub response: String,
    pub data: TurnData,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_key: String,
}

/// Trip information for an impact calculation
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub distance_km: f64,
    pub mode: String,
}

/// One carbon-intensity reading to record
#[derive(Debug, Deserialize)]
pub struct ReadingRequest {
    pub location: String,
    pub gco2_per_kwh: f64,
    /// Absent means "now"
    #[serde(default)]
    pub ts_utc: Option<DateTime<Utc>>,
}

/// Response for reading insertion
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub inserted: bool,
}

/// Query for the lowest-intensity windows
#[derive(Debug, Deserialize)]
pub struct IntensityQuery {
    pub location: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query for route planning
#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Query filter for accessibility alerts
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    #[serde(default)]
    pub station_id: Option<String>,
}

/// Alerts plus their count
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<crate::transit::AccessibilityAlert>,
    pub total_alerts: usize,
}

/// Signals to combine into one rider update
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub transit: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub vision: String,
}

/// Messy speech-to-text to decode
#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    pub text: String,
}

/// Plain-text chat result
#[derive(Debug, Serialize)]
pub struct ChatTextResponse {
    pub text: String,
}

/// Health probe payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
