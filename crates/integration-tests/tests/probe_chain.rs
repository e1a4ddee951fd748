//! Probe chain tests
//!
//! Exercises the full decorator chain the daemon wires:
//! MaintenanceSwitch -> HistoricalProbe -> SingleFlightProbe -> probe

use async_trait::async_trait;
use healthprobe_core::config::HealthConfig;
use healthprobe_core::domain::{ProbeLevel, ProbeResult, ProbeStatus};
use healthprobe_core::port::probe::mocks::{GatedProbe, MockBehavior, MockProbe};
use healthprobe_core::port::{Probe, ProbeError, ProbeOutcome};
use healthprobe_daemon::build_chain;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Probe replaying a fixed script of outcomes, then OK forever
struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeOutcome>>,
}

impl ScriptedProbe {
    fn new(script: Vec<ProbeOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, _level: ProbeLevel) -> ProbeOutcome {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProbeResult::new("scripted", ProbeStatus::Ok, "fine")))
    }
}

fn config_with_history(history_size: usize) -> HealthConfig {
    HealthConfig {
        history_size,
        ..HealthConfig::default()
    }
}

/// A transient failure turns into a WARNING until it leaves the window
#[tokio::test]
async fn test_transient_failure_is_smoothed() {
    let probe = Arc::new(ScriptedProbe::new(vec![
        Ok(ProbeResult::new("scripted", ProbeStatus::Ok, "fine")),
        Err(ProbeError::Timeout(500)),
    ]));
    let chain = build_chain(&config_with_history(4), probe).unwrap();

    let first = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(first.status(), ProbeStatus::Ok);

    let failed = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(failed.status(), ProbeStatus::Warning);
    assert_eq!(
        failed.message(),
        "There was an error percentage of 25 in the last runs: FAILURE - No response within 500ms"
    );

    // Still in the window for three more OK runs
    for _ in 0..2 {
        let recovering = chain.probe.check(ProbeLevel::Basic).await;
        assert_eq!(recovering.status(), ProbeStatus::Warning);
    }
    let recovered = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(recovered.status(), ProbeStatus::Ok);
}

/// An ERROR is reported as is, whatever the history holds
#[tokio::test]
async fn test_error_short_circuits_through_chain() {
    let probe = Arc::new(ScriptedProbe::new(vec![
        Ok(ProbeResult::new("scripted", ProbeStatus::Warning, "slow")),
        Err(ProbeError::Unreachable("db:5432".to_string())),
    ]));
    let chain = build_chain(&config_with_history(10), probe).unwrap();

    chain.probe.check(ProbeLevel::Basic).await;
    let result = chain.probe.check(ProbeLevel::Basic).await;

    assert_eq!(result.status(), ProbeStatus::Error);
    assert_eq!(result.message(), "FAILURE - Target unreachable: db:5432");
    assert_eq!(chain.history.history().len(), 2);
}

/// Many concurrent callers never run the probe more than once at a time
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_execution() {
    let mock = Arc::new(MockProbe::new_ok("db").with_delay(Duration::from_millis(20)));
    let chain = build_chain(&config_with_history(50), mock.clone()).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let probe = chain.probe.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..3 {
                let result = probe.check(ProbeLevel::Extended).await;
                assert_eq!(result.status(), ProbeStatus::Ok);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(mock.max_in_flight(), 1);
    assert!(mock.call_count() < 48);
    // Only real executions are recorded, not the replays served to other callers
    assert_eq!(chain.history.history().len(), mock.call_count());
}

/// Callers arriving during a run get the previous result without waiting
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_caller_during_run_gets_placeholder() {
    let gated = Arc::new(GatedProbe::new("db", "finally"));
    let chain = build_chain(&config_with_history(10), gated.clone()).unwrap();

    let probe = chain.probe.clone();
    let slow = tokio::spawn(async move { probe.check(ProbeLevel::Basic).await });
    gated.wait_entered().await;

    let fast = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(fast.status(), ProbeStatus::Ok);
    assert_eq!(fast.source_name(), "init");
    assert_eq!(fast.message(), "only for initialization");
    assert!(chain.history.history().is_empty());

    gated.release();
    let slow = slow.await.unwrap();
    assert_eq!(slow.message(), "finally");
    assert_eq!(gated.call_count(), 1);
    assert_eq!(chain.history.history().len(), 1);
}

/// Maintenance answers never reach the history window
#[tokio::test]
async fn test_maintenance_bypasses_history() {
    let mock = Arc::new(MockProbe::new_ok("db"));
    let chain = build_chain(&config_with_history(10), mock.clone()).unwrap();

    chain.probe.check(ProbeLevel::Basic).await;
    chain.probe.enable("Database upgrade");

    let result = chain.probe.check(ProbeLevel::Thorough).await;
    assert_eq!(result.status(), ProbeStatus::Maintenance);
    assert_eq!(result.message(), "Database upgrade");
    assert_eq!(mock.call_count(), 1);
    assert_eq!(chain.history.history().len(), 1);

    chain.probe.disable();
    chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(mock.call_count(), 2);
}

/// A panicking probe degrades into an ERROR without breaking later runs
#[tokio::test]
async fn test_panicking_probe_is_contained() {
    let mock = Arc::new(MockProbe::new_panic_inducing("db", "driver crashed"));
    let chain = build_chain(&config_with_history(10), mock.clone()).unwrap();

    let result = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(result.status(), ProbeStatus::Error);
    assert!(result.message().contains("driver crashed"));

    mock.set_behavior(MockBehavior::ok("recovered"));
    let result = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(result.status(), ProbeStatus::Warning);
    assert!(result.message().starts_with("There was an error percentage of 10"));
    assert_eq!(mock.call_count(), 2);
}

/// The TCP probe selected from configuration runs through the chain
#[tokio::test]
async fn test_tcp_probe_from_config() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = HealthConfig {
        tcp_target: Some(addr.to_string()),
        tcp_timeout: Duration::from_secs(2),
        ..HealthConfig::default()
    };
    let chain = build_chain(&config, healthprobe_daemon::select_probe(&config)).unwrap();

    let result = chain.probe.check(ProbeLevel::Thorough).await;
    assert_eq!(result.status(), ProbeStatus::Ok);
    assert_eq!(result.source_name(), format!("TCP probe {}", addr));
    assert_eq!(
        result.extras().and_then(|extras| extras.get("target")),
        Some(&addr.to_string())
    );

    drop(listener);
    let result = chain.probe.check(ProbeLevel::Basic).await;
    assert_eq!(result.status(), ProbeStatus::Error);
}
