//! Single-flight coordination for probe executions
//!
//! At most one execution of the wrapped probe runs at a time. Callers that arrive
//! while an execution is running do not wait for it: they are served the last
//! stored result immediately.

use crate::application::constants::{INITIAL_RESULT_MESSAGE, INITIAL_RESULT_NAME};
use crate::application::guard::execute_probe;
use crate::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use crate::port::{Probe, ProbeOutcome, Sample};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Probe decorator that never runs its delegate concurrently
pub struct SingleFlightProbe {
    delegate: Arc<dyn Probe>,
    in_flight: AtomicBool,
    last_result: RwLock<ProbeResult>,
}

/// Exclusion token, released on drop
///
/// Dropping also covers a panicking probe and a caller whose future is cancelled
/// mid-execution.
struct FlightToken<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightToken<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SingleFlightProbe {
    /// Wrap a probe
    ///
    /// Until the first execution completes, the stored result is a placeholder
    /// (`init`, OK, "only for initialization").
    pub fn new(delegate: Arc<dyn Probe>) -> Self {
        Self {
            delegate,
            in_flight: AtomicBool::new(false),
            last_result: RwLock::new(ProbeResult::new(
                INITIAL_RESULT_NAME,
                ProbeStatus::Ok,
                INITIAL_RESULT_MESSAGE,
            )),
        }
    }

    /// Run the delegate, or serve the stored result if it is already running
    ///
    /// Never blocks on another caller. Never fails: probe errors and panics are
    /// converted into results (see `execute_probe`).
    pub async fn check(&self, level: ProbeLevel) -> ProbeResult {
        self.check_fresh(level).await.0
    }

    /// Same as `check`, plus whether the result came from running the delegate
    /// (`true`) or from the stored slot (`false`)
    pub async fn check_fresh(&self, level: ProbeLevel) -> (ProbeResult, bool) {
        let Some(_token) = self.try_acquire() else {
            debug!(
                probe = %self.delegate.name(),
                level = %level,
                "Probe already running, serving last known result"
            );
            return (self.last_result(), false);
        };

        let result = execute_probe(self.delegate.as_ref(), level).await;
        *self.last_result.write() = result.clone();

        debug!(
            probe = %self.delegate.name(),
            level = %level,
            status = %result.status(),
            "Stored fresh probe result"
        );
        (result, true)
    }

    /// Most recently stored result
    pub fn last_result(&self) -> ProbeResult {
        self.last_result.read().clone()
    }

    /// Whether an execution is running right now
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<FlightToken<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| FlightToken {
                flag: &self.in_flight,
            })
    }
}

#[async_trait]
impl Probe for SingleFlightProbe {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
        Ok(self.check(level).await)
    }

    async fn execute_sample(&self, level: ProbeLevel) -> Sample {
        let (result, fresh) = self.check_fresh(level).await;
        Sample {
            outcome: Ok(result),
            fresh,
        }
    }
}
