// Fault isolation for probe executions
use crate::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use crate::port::{Probe, ProbeOutcome, Sample};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{error, warn};

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum GuardResult<T> {
    /// Execution completed (possibly with an error value)
    Completed(T),
    /// Execution panicked
    Panicked(String),
}

/// Await a future with panic isolation
///
/// If the future panics while being polled, the panic is caught and returned as
/// `GuardResult::Panicked`. Requires unwinding panics (`panic = "unwind"`).
///
/// # Example
/// ```text
/// let result = execute_guarded(async { panic!("probe blew up") }).await;
/// assert!(matches!(result, GuardResult::Panicked(_)));
/// ```
pub async fn execute_guarded<F, T>(future: F) -> GuardResult<T>
where
    F: Future<Output = T>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(value) => GuardResult::Completed(value),
        Err(payload) => GuardResult::Panicked(panic_message(payload.as_ref())),
    }
}

/// Run a probe and always come back with a result
///
/// Probe errors become a result with the error's proposed status; panics become an
/// `Error` result. Both are logged, neither is re-raised.
pub async fn execute_probe(probe: &dyn Probe, level: ProbeLevel) -> ProbeResult {
    let guarded = execute_guarded(probe.execute(level)).await;
    settle(probe, level, guarded)
}

/// Like `execute_probe`, also telling whether the result was produced by this call
///
/// Failed and panicked executions always count as fresh.
pub async fn execute_probe_sample(probe: &dyn Probe, level: ProbeLevel) -> (ProbeResult, bool) {
    match execute_guarded(probe.execute_sample(level)).await {
        GuardResult::Completed(Sample { outcome, fresh }) => {
            (settle(probe, level, GuardResult::Completed(outcome)), fresh)
        }
        GuardResult::Panicked(panic_msg) => {
            (settle(probe, level, GuardResult::Panicked(panic_msg)), true)
        }
    }
}

fn settle(probe: &dyn Probe, level: ProbeLevel, guarded: GuardResult<ProbeOutcome>) -> ProbeResult {
    match guarded {
        GuardResult::Completed(Ok(result)) => result,
        GuardResult::Completed(Err(e)) => {
            warn!(
                probe = %probe.name(),
                level = %level,
                status = %e.proposed_status(),
                error = %e,
                "Probe execution failed"
            );
            e.into_result(probe.name())
        }
        GuardResult::Panicked(panic_msg) => {
            error!(
                probe = %probe.name(),
                level = %level,
                panic_msg = %panic_msg,
                "Probe execution panicked"
            );
            ProbeResult::new(
                probe.name(),
                ProbeStatus::Error,
                format!("FAILURE - Probe panicked: {}", panic_msg),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
