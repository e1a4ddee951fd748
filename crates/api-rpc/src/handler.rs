//! RPC Method Handlers
//!
//! Implements the logic behind each JSON-RPC method.

use crate::error::to_rpc_error;
use crate::types::{
    HistoryRequest, HistoryResponse, MaintenanceRequest, MaintenanceResponse, PingRequest,
    PingResponse,
};
use healthprobe_core::application::{HistoricalProbe, MaintenanceSwitch};
use healthprobe_core::domain::ProbeLevel;
use healthprobe_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// RPC Handler with injected dependencies
///
/// `probe` is the outermost layer of the chain; `history` is the aggregator
/// inside it, kept separately so its window can be read without a probe run.
pub struct RpcHandler {
    probe: Arc<MaintenanceSwitch>,
    history: Arc<HistoricalProbe>,
    default_level: ProbeLevel,
}

impl RpcHandler {
    pub fn new(
        probe: Arc<MaintenanceSwitch>,
        history: Arc<HistoricalProbe>,
        default_level: ProbeLevel,
    ) -> Self {
        Self {
            probe,
            history,
            default_level,
        }
    }

    /// health.ping.v1
    pub async fn ping(&self, params: PingRequest) -> Result<PingResponse, ErrorObjectOwned> {
        let level = ProbeLevel::parse_or(params.level.as_deref(), self.default_level);
        let mut result = self.probe.check(level).await;
        if level == ProbeLevel::Thorough {
            // Thorough answers always carry a results map, even an empty one
            result = result.into_thorough();
        }

        debug!(
            level = %level,
            status = %result.status(),
            "health.ping.v1 answered"
        );

        Ok(PingResponse::from(result))
    }

    /// health.history.v1
    pub async fn history(
        &self,
        _params: HistoryRequest,
    ) -> Result<HistoryResponse, ErrorObjectOwned> {
        Ok(HistoryResponse {
            capacity: self.history.capacity(),
            entries: self.history.history(),
        })
    }

    /// admin.maintenance.v1
    pub async fn maintenance(
        &self,
        params: MaintenanceRequest,
    ) -> Result<MaintenanceResponse, ErrorObjectOwned> {
        if params.enabled {
            self.probe.enable(params.message.unwrap_or_default());
        } else {
            if params.message.is_some() {
                return Err(to_rpc_error(AppError::Validation(
                    "message is only accepted when enabling maintenance".to_string(),
                )));
            }
            self.probe.disable();
        }

        info!(enabled = params.enabled, "admin.maintenance.v1 applied");

        Ok(MaintenanceResponse {
            enabled: self.probe.is_enabled(),
            message: self.probe.message(),
        })
    }
}
