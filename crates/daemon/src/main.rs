//! Healthprobe Daemon - Main Entry Point

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthprobe_api_rpc::{RpcServer, RpcServerConfig};
use healthprobe_core::config::HealthConfig;
use healthprobe_daemon::{build_chain, select_probe};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format =
        std::env::var("HEALTHPROBE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("healthprobe=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Healthprobe daemon v{} starting...", VERSION);

    // 2. Load configuration
    let config = HealthConfig::from_env().context("Invalid configuration")?;

    // 3. Wire the probe chain
    let chain = build_chain(&config, select_probe(&config))?;

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(
        RpcServerConfig::from(&config),
        chain.probe,
        chain.history,
        config.default_level,
    );
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, default_level = %config.default_level, "Ready");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
