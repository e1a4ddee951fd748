//! JSON-RPC Server
//!
//! Serves the probe chain over JSON-RPC 2.0 on TCP.

use crate::handler::RpcHandler;
use crate::types::{HistoryRequest, MaintenanceRequest, PingRequest};
use healthprobe_core::application::constants::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use healthprobe_core::application::{HistoricalProbe, MaintenanceSwitch};
use healthprobe_core::config::HealthConfig;
use healthprobe_core::domain::ProbeLevel;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

impl From<&HealthConfig> for RpcServerConfig {
    fn from(config: &HealthConfig) -> Self {
        Self {
            host: config.rpc_host.clone(),
            port: config.rpc_port,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        probe: Arc<MaintenanceSwitch>,
        history: Arc<HistoricalProbe>,
        default_level: ProbeLevel,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(probe, history, default_level)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful with port 0) and the handle that stops it.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("health.ping.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PingRequest = parse_or_default(params)?;
                    handler.ping(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("health.history.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: HistoryRequest = parse_or_default(params)?;
                    handler.history(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.maintenance.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: MaintenanceRequest = params.parse()?;
                    handler.maintenance(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}

/// Methods whose parameters are all optional also accept a call without params
fn parse_or_default<T>(
    params: jsonrpsee::types::Params<'static>,
) -> Result<T, jsonrpsee::types::ErrorObjectOwned>
where
    T: serde::de::DeserializeOwned + Default,
{
    if params.as_str().is_none() {
        return Ok(T::default());
    }
    params.parse()
}
