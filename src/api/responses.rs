//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GateState, InputStatus, SubmissionView, TimerState};

/// Response for simulated user actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub gate: Option<GateState>,
}

impl ApiResponse {
    pub fn new(status: String, message: String, gate: Option<GateState>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            gate,
        }
    }

    pub fn ok(message: String, gate: Option<GateState>) -> Self {
        Self::new("ok".to_string(), message, gate)
    }

    pub fn error(message: String, gate: Option<GateState>) -> Self {
        Self::new("error".to_string(), message, gate)
    }
}

/// Snapshot of the page and both behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: Option<TimerState>,
    pub gate: Option<GateState>,
    pub inputs: Vec<InputStatus>,
    pub submissions: Vec<SubmissionView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
