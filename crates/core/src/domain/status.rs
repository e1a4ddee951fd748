// Probe Status Domain Model

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome category of a probe run
///
/// Not ordered by severity. Everything except `Ok` counts as non-healthy when
/// history is aggregated, and `Error` is never masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeStatus {
    /// Healthy
    Ok,
    /// Healthy, but recent runs show a degrading trend
    Warning,
    /// Hard failure
    Error,
    /// Credentials for the checked system were rejected
    AuthenticationError,
    /// The checked system did not respond in time
    TimeoutError,
    /// Intentionally disabled by configuration
    Maintenance,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Ok => "OK",
            ProbeStatus::Warning => "WARNING",
            ProbeStatus::Error => "ERROR",
            ProbeStatus::AuthenticationError => "AUTHENTICATION_ERROR",
            ProbeStatus::TimeoutError => "TIMEOUT_ERROR",
            ProbeStatus::Maintenance => "MAINTENANCE",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok)
    }

    /// HTTP status code a transport adapter should answer with
    pub fn http_status_code(&self) -> u16 {
        match self {
            ProbeStatus::Ok | ProbeStatus::Warning => 200,
            ProbeStatus::Error => 500,
            ProbeStatus::AuthenticationError => 401,
            ProbeStatus::TimeoutError | ProbeStatus::Maintenance => 503,
        }
    }
}

impl FromStr for ProbeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ProbeStatus::Ok),
            "WARNING" => Ok(ProbeStatus::Warning),
            "ERROR" => Ok(ProbeStatus::Error),
            "AUTHENTICATION_ERROR" => Ok(ProbeStatus::AuthenticationError),
            "TIMEOUT_ERROR" => Ok(ProbeStatus::TimeoutError),
            "MAINTENANCE" => Ok(ProbeStatus::Maintenance),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
