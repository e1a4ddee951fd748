// Probe Port - pluggable health check capability
// reason: async-trait 필요 (probes usually do network I/O)
use crate::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Probe failures
///
/// Each variant proposes the status the failure should be reported with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("FAILURE - Target unreachable: {0}")]
    Unreachable(String),

    #[error("FAILURE - Authentication rejected: {0}")]
    Authentication(String),

    #[error("FAILURE - No response within {0}ms")]
    Timeout(u64),

    #[error("FAILURE - {0}")]
    Failed(String),

    #[error("{0}")]
    Maintenance(String),
}

impl ProbeError {
    /// Status a result built from this error should carry
    pub fn proposed_status(&self) -> ProbeStatus {
        match self {
            ProbeError::Unreachable(_) | ProbeError::Failed(_) => ProbeStatus::Error,
            ProbeError::Authentication(_) => ProbeStatus::AuthenticationError,
            ProbeError::Timeout(_) => ProbeStatus::TimeoutError,
            ProbeError::Maintenance(_) => ProbeStatus::Maintenance,
        }
    }

    /// Convert into a result attributed to `source_name`
    pub fn into_result(self, source_name: impl Into<String>) -> ProbeResult {
        ProbeResult::new(source_name, self.proposed_status(), self.to_string())
    }
}

/// Outcome of a single probe execution
pub type ProbeOutcome = std::result::Result<ProbeResult, ProbeError>;

/// Outcome of an execution that may have been answered from a stored result
#[derive(Debug, Clone)]
pub struct Sample {
    pub outcome: ProbeOutcome,
    /// `false` when the outcome replays an earlier execution
    pub fresh: bool,
}

/// Probe port for health checks
///
/// Implementations:
/// - SystemResourceProbe / TcpConnectProbe (infra-system)
/// - SingleFlightProbe, HistoricalProbe, MaintenanceSwitch: decorators over another probe
#[async_trait]
pub trait Probe: Send + Sync {
    /// Name shown in results and overviews
    fn name(&self) -> &str;

    /// Run the check at the given level
    ///
    /// # Errors
    /// Any `ProbeError`; callers must also tolerate `Ok` results with a non-OK status.
    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome;

    /// Run the check and report whether this call produced the outcome
    ///
    /// Probes that can answer from a stored result override this. The default
    /// always executes, so every outcome is fresh.
    async fn execute_sample(&self, level: ProbeLevel) -> Sample {
        Sample {
            outcome: self.execute(level).await,
            fresh: true,
        }
    }

    /// Run the lightweight check
    async fn execute_basic(&self) -> ProbeOutcome {
        debug!(probe = %self.name(), "Execute the basic probe");
        self.execute(ProbeLevel::Basic).await
    }

    /// Run the extended check
    async fn execute_extended(&self) -> ProbeOutcome {
        debug!(probe = %self.name(), "Execute the extended probe");
        self.execute(ProbeLevel::Extended).await
    }

    /// Run the thorough check
    ///
    /// The returned result always carries extras, empty if the probe supplied none.
    async fn execute_thorough(&self) -> ProbeOutcome {
        debug!(probe = %self.name(), "Execute the thorough probe");
        self.execute(ProbeLevel::Thorough)
            .await
            .map(ProbeResult::into_thorough)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Mock probe behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Return a result with this status and message
        Respond(ProbeStatus, String),
        /// Fail with this error
        Fail(ProbeError),
        /// Panic with message (for fault isolation testing)
        Panic(String),
    }

    impl MockBehavior {
        pub fn ok(message: impl Into<String>) -> Self {
            MockBehavior::Respond(ProbeStatus::Ok, message.into())
        }

        pub fn status(status: ProbeStatus, message: impl Into<String>) -> Self {
            MockBehavior::Respond(status, message.into())
        }
    }

    /// Mock Probe for testing
    ///
    /// Behaves per level when a level-specific behavior is set, otherwise uses the
    /// default behavior. Tracks how many executions ran and how many overlapped.
    pub struct MockProbe {
        name: String,
        default_behavior: Mutex<MockBehavior>,
        level_behaviors: Mutex<HashMap<ProbeLevel, MockBehavior>>,
        delay: Option<Duration>,
        call_count: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockProbe {
        pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
            Self {
                name: name.into(),
                default_behavior: Mutex::new(behavior),
                level_behaviors: Mutex::new(HashMap::new()),
                delay: None,
                call_count: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn new_ok(name: impl Into<String>) -> Self {
            Self::new(name, MockBehavior::ok("nothing"))
        }

        pub fn new_fail(name: impl Into<String>, error: ProbeError) -> Self {
            Self::new(name, MockBehavior::Fail(error))
        }

        pub fn new_panic_inducing(name: impl Into<String>, message: impl Into<String>) -> Self {
            Self::new(name, MockBehavior::Panic(message.into()))
        }

        /// Sleep this long inside every execution
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn with_level(self, level: ProbeLevel, behavior: MockBehavior) -> Self {
            self.level_behaviors.lock().unwrap().insert(level, behavior);
            self
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.default_behavior.lock().unwrap() = behavior;
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Highest number of executions observed running at the same time
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        fn behavior_for(&self, level: ProbeLevel) -> MockBehavior {
            if let Some(behavior) = self.level_behaviors.lock().unwrap().get(&level) {
                return behavior.clone();
            }
            self.default_behavior.lock().unwrap().clone()
        }
    }

    /// Decrements the in-flight counter even when the execution panics
    struct InFlight<'a>(&'a AtomicUsize);

    impl Drop for InFlight<'_> {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Probe for MockProbe {
        fn name(&self) -> &str {
            &self.name
        }

        async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let _in_flight = InFlight(&self.in_flight);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match self.behavior_for(level) {
                MockBehavior::Respond(status, message) => {
                    Ok(ProbeResult::new(self.name.clone(), status, message))
                }
                MockBehavior::Fail(error) => Err(error),
                MockBehavior::Panic(message) => {
                    panic!("{}", message); // Actually panic for fault isolation testing
                }
            }
        }
    }

    /// Probe that blocks inside `execute` until released
    ///
    /// Lets tests hold one execution in flight deterministically.
    pub struct GatedProbe {
        name: String,
        message: String,
        entered: Arc<Notify>,
        release: Arc<Notify>,
        call_count: AtomicUsize,
    }

    impl GatedProbe {
        pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                message: message.into(),
                entered: Arc::new(Notify::new()),
                release: Arc::new(Notify::new()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Wait until an execution is running inside the probe
        pub async fn wait_entered(&self) {
            self.entered.notified().await;
        }

        /// Let the running execution finish
        pub fn release(&self) {
            self.release.notify_one();
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for GatedProbe {
        fn name(&self) -> &str {
            &self.name
        }

        async fn execute(&self, _level: ProbeLevel) -> ProbeOutcome {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(ProbeResult::new(
                self.name.clone(),
                ProbeStatus::Ok,
                self.message.clone(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MockBehavior, MockProbe};
    use super::*;

    #[test]
    fn test_error_proposes_status() {
        assert_eq!(
            ProbeError::Authentication("bad password".into()).proposed_status(),
            ProbeStatus::AuthenticationError
        );
        assert_eq!(ProbeError::Timeout(2000).proposed_status(), ProbeStatus::TimeoutError);
        assert_eq!(
            ProbeError::Unreachable("refused".into()).proposed_status(),
            ProbeStatus::Error
        );

        let result = ProbeError::Timeout(250).into_result("db");
        assert_eq!(result.source_name(), "db");
        assert_eq!(result.status(), ProbeStatus::TimeoutError);
        assert_eq!(result.message(), "FAILURE - No response within 250ms");
    }

    #[tokio::test]
    async fn test_default_level_helpers() {
        let probe = MockProbe::new_ok("mock")
            .with_level(ProbeLevel::Extended, MockBehavior::status(ProbeStatus::Error, "an error"));

        let basic = probe.execute_basic().await.unwrap();
        assert_eq!(basic.status(), ProbeStatus::Ok);
        assert!(basic.extras().is_none());

        let extended = probe.execute_extended().await.unwrap();
        assert_eq!(extended.status(), ProbeStatus::Error);

        let thorough = probe.execute_thorough().await.unwrap();
        assert!(thorough.extras().is_some_and(|extras| extras.is_empty()));
        assert_eq!(probe.call_count(), 3);
    }

    #[test]
    fn test_mock_failure_passes_through() {
        let probe = MockProbe::new_fail("mock", ProbeError::Failed("boom".into()));
        let outcome = tokio_test::block_on(probe.execute(ProbeLevel::Basic));
        assert_eq!(outcome, Err(ProbeError::Failed("boom".into())));
    }
}
