//! Healthprobe Daemon - Probe chain wiring
//!
//! Builds the decorator chain from configuration:
//! MaintenanceSwitch -> HistoricalProbe -> SingleFlightProbe -> concrete probe

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use healthprobe_core::application::{HistoricalProbe, MaintenanceSwitch, SingleFlightProbe};
use healthprobe_core::config::HealthConfig;
use healthprobe_core::port::Probe;
use healthprobe_infra_system::{SystemResourceProbe, TcpConnectProbe};

/// Wired probe chain
///
/// `history` is the aggregator wrapped by `probe`, kept for reading the window.
pub struct ProbeChain {
    pub probe: Arc<MaintenanceSwitch>,
    pub history: Arc<HistoricalProbe>,
}

/// Pick the concrete probe named by the configuration
pub fn select_probe(config: &HealthConfig) -> Arc<dyn Probe> {
    match &config.tcp_target {
        Some(target) => Arc::new(TcpConnectProbe::new(target.clone(), config.tcp_timeout)),
        None => Arc::new(SystemResourceProbe::new(
            config.cpu_warn_percent,
            config.memory_warn_percent,
        )),
    }
}

/// Wrap `probe` in the coordination layers
pub fn build_chain(config: &HealthConfig, probe: Arc<dyn Probe>) -> Result<ProbeChain> {
    info!(
        probe = %probe.name(),
        history_size = config.history_size,
        "Wiring probe chain"
    );

    let single_flight: Arc<dyn Probe> = Arc::new(SingleFlightProbe::new(probe));
    let history = Arc::new(
        HistoricalProbe::new(single_flight, config.history_size)
            .context("Invalid history size")?,
    );
    let switch = Arc::new(MaintenanceSwitch::new(history.clone()));

    if config.maintenance {
        switch.enable(config.maintenance_message.clone().unwrap_or_default());
    }

    Ok(ProbeChain {
        probe: switch,
        history,
    })
}
