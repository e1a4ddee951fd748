//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use healthprobe_core::domain::{ProbeExtras, ProbeResult};
use serde::{Deserialize, Serialize};

/// health.ping.v1 - Run the probe chain
#[derive(Debug, Default, Deserialize)]
pub struct PingRequest {
    /// Level name or 1-3; the configured default when absent or unknown
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub executor_name: String,
    pub status: String,
    /// HTTP-equivalent code for the status (200, 401, 500, 503)
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thorough_results: Option<ProbeExtras>,
}

impl From<ProbeResult> for PingResponse {
    fn from(result: ProbeResult) -> Self {
        Self {
            executor_name: result.source_name().to_string(),
            status: result.status().as_str().to_string(),
            status_code: result.status().http_status_code(),
            message: result.message().to_string(),
            thorough_results: result.extras().cloned(),
        }
    }
}

/// health.history.v1 - Read the history window
#[derive(Debug, Default, Deserialize)]
pub struct HistoryRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub capacity: usize,
    /// Most recent first
    pub entries: Vec<ProbeResult>,
}

/// admin.maintenance.v1 - Toggle maintenance mode
#[derive(Debug, Deserialize)]
pub struct MaintenanceRequest {
    pub enabled: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceResponse {
    pub enabled: bool,
    pub message: Option<String>,
}
