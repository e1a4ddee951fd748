//! Historical aggregation of probe results
//!
//! Keeps a bounded, most-recent-first window of results and turns recent non-OK
//! results into a WARNING instead of flapping between OK and failure. ERROR
//! results are never masked.

use crate::application::guard::execute_probe_sample;
use crate::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use crate::error::{AppError, Result};
use crate::port::{Probe, ProbeOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Probe decorator that remembers the last `capacity` results
pub struct HistoricalProbe {
    delegate: Arc<dyn Probe>,
    capacity: usize,
    window: Mutex<VecDeque<ProbeResult>>,
}

impl HistoricalProbe {
    /// Wrap a probe, keeping at most `capacity` results
    ///
    /// # Errors
    /// `AppError::Validation` if `capacity` is zero
    pub fn new(delegate: Arc<dyn Probe>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AppError::Validation(
                "history capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            delegate,
            capacity,
            window: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the window, most recent first
    pub fn history(&self) -> Vec<ProbeResult> {
        self.window.lock().iter().cloned().collect()
    }

    /// Run the delegate and aggregate its result with the window
    ///
    /// Returns the result as is when it is an ERROR or when the whole window is OK.
    /// Otherwise returns a WARNING naming the share of non-OK results and the
    /// message of the oldest one still in the window.
    ///
    /// Only results the delegate actually produced enter the window; replays of a
    /// stored result (a single-flight delegate under contention) are aggregated
    /// against the unchanged window.
    pub async fn check(&self, level: ProbeLevel) -> ProbeResult {
        let (result, fresh) = execute_probe_sample(self.delegate.as_ref(), level).await;
        self.record(result, fresh)
    }

    fn record(&self, result: ProbeResult, fresh: bool) -> ProbeResult {
        let mut window = self.window.lock();
        if fresh {
            window.push_front(result.clone());
            window.truncate(self.capacity);
        }

        if result.status() == ProbeStatus::Error {
            return result;
        }

        // Scanned newest to oldest; the last non-OK entry seen names the warning
        let (num_non_ok, oldest_non_ok) = window
            .iter()
            .filter(|entry| !entry.is_ok())
            .fold((0, None), |(count, _), entry| (count + 1, Some(entry)));
        let Some(oldest_non_ok) = oldest_non_ok else {
            return result;
        };

        // Normalized by capacity, not by how full the window is
        let error_percentage = num_non_ok * 100 / self.capacity;

        let message = format!(
            "There was an error percentage of {} in the last runs: {}",
            error_percentage,
            oldest_non_ok.message()
        );

        if result.is_ok() {
            debug!(
                probe = %self.delegate.name(),
                error_percentage = error_percentage,
                "Result is OK but history is not, reporting WARNING"
            );
        } else {
            warn!(
                probe = %self.delegate.name(),
                status = %result.status(),
                error_percentage = error_percentage,
                "Probe degraded, reporting WARNING"
            );
        }

        ProbeResult::new(self.delegate.name(), ProbeStatus::Warning, message)
    }
}

#[async_trait]
impl Probe for HistoricalProbe {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
        Ok(self.check(level).await)
    }
}
