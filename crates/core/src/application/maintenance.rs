// Maintenance Switch
// Reports MAINTENANCE without touching the wrapped probe while switched on

use crate::application::constants::DEFAULT_MAINTENANCE_MESSAGE;
use crate::application::guard::execute_probe;
use crate::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use crate::port::{Probe, ProbeOutcome};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Probe decorator toggled by configuration or an admin call
///
/// Meant to be the outermost layer so maintenance results never enter the
/// history window.
pub struct MaintenanceSwitch {
    delegate: Arc<dyn Probe>,
    message: RwLock<Option<String>>,
}

impl MaintenanceSwitch {
    pub fn new(delegate: Arc<dyn Probe>) -> Self {
        Self {
            delegate,
            message: RwLock::new(None),
        }
    }

    /// Switch maintenance on; an empty message falls back to the default one
    pub fn enable(&self, message: impl Into<String>) {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_MAINTENANCE_MESSAGE.to_string()
        } else {
            message
        };

        info!(probe = %self.delegate.name(), message = %message, "Maintenance mode enabled");
        *self.message.write() = Some(message);
    }

    pub fn disable(&self) {
        info!(probe = %self.delegate.name(), "Maintenance mode disabled");
        *self.message.write() = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.message.read().is_some()
    }

    /// Message reported while enabled
    pub fn message(&self) -> Option<String> {
        self.message.read().clone()
    }

    pub async fn check(&self, level: ProbeLevel) -> ProbeResult {
        if let Some(message) = self.message() {
            return ProbeResult::new(self.delegate.name(), ProbeStatus::Maintenance, message);
        }
        execute_probe(self.delegate.as_ref(), level).await
    }
}

#[async_trait]
impl Probe for MaintenanceSwitch {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
        Ok(self.check(level).await)
    }
}
