// Probe Result Domain Model

use super::status::ProbeStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra key/value pairs attached to thorough results
pub type ProbeExtras = BTreeMap<String, String>;

/// Immutable outcome of one probe execution
///
/// `extras` is only populated for results of a Thorough run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    source_name: String,
    status: ProbeStatus,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extras: Option<ProbeExtras>,
}

impl ProbeResult {
    pub fn new(
        source_name: impl Into<String>,
        status: ProbeStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            status,
            message: message.into(),
            extras: None,
        }
    }

    /// Result of a Thorough run carrying extra diagnostic values
    pub fn thorough(
        source_name: impl Into<String>,
        status: ProbeStatus,
        message: impl Into<String>,
        extras: ProbeExtras,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            status,
            message: message.into(),
            extras: Some(extras),
        }
    }

    /// Same result with extras attached (empty map if none were present)
    pub fn into_thorough(self) -> Self {
        let extras = self.extras.unwrap_or_default();
        Self {
            extras: Some(extras),
            ..self
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extras(&self) -> Option<&ProbeExtras> {
        self.extras.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_extras() {
        let result = ProbeResult::new("db", ProbeStatus::Ok, "fine");
        assert_eq!(result.source_name(), "db");
        assert_eq!(result.message(), "fine");
        assert!(result.is_ok());
        assert!(result.extras().is_none());
    }

    #[test]
    fn test_into_thorough_keeps_existing_extras() {
        let mut extras = ProbeExtras::new();
        extras.insert("item1".to_string(), "value One".to_string());

        let result = ProbeResult::thorough("demo", ProbeStatus::Ok, "more", extras.clone());
        assert_eq!(result.clone().into_thorough().extras(), Some(&extras));

        let plain = ProbeResult::new("demo", ProbeStatus::Error, "nope").into_thorough();
        assert_eq!(plain.extras().map(|e| e.len()), Some(0));
        assert_eq!(plain.status(), ProbeStatus::Error);
    }

    #[test]
    fn test_serialization_omits_missing_extras() {
        let json = serde_json::to_value(ProbeResult::new("db", ProbeStatus::Warning, "slow")).unwrap();
        assert_eq!(json["status"], "WARNING");
        assert!(json.get("extras").is_none());
    }
}
