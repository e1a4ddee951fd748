//! Healthprobe CLI - Command-line client for the Healthprobe daemon

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "healthprobe")]
#[command(about = "Healthprobe CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "HEALTHPROBE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the health probe
    Ping {
        /// BASIC, EXTENDED, THOROUGH or 1-3 (daemon default when omitted)
        #[arg(short, long)]
        level: Option<String>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Show the recent probe results, newest first
    History,

    /// Switch maintenance mode on or off
    #[command(group(ArgGroup::new("mode").required(true).args(["enable", "disable"])))]
    Maintenance {
        #[arg(long)]
        enable: bool,

        #[arg(long)]
        disable: bool,

        /// Message reported while in maintenance
        #[arg(short, long, requires = "enable")]
        message: Option<String>,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct PingResult {
    executor_name: String,
    status: String,
    status_code: u16,
    message: String,
    #[serde(default)]
    thorough_results: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct HistoryResult {
    capacity: usize,
    entries: Vec<HistoryEntry>,
}

#[derive(Deserialize, Tabled)]
struct HistoryEntry {
    #[tabled(rename = "probe")]
    source_name: String,
    status: String,
    message: String,
}

#[derive(Deserialize)]
struct MaintenanceResult {
    enabled: bool,
    message: Option<String>,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn paint_status(status: &str) -> ColoredString {
    match status {
        "OK" => status.green().bold(),
        "WARNING" | "MAINTENANCE" => status.yellow().bold(),
        _ => status.red().bold(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { level, json } => {
            let params = match level {
                Some(level) => json!({ "level": level }),
                None => json!({}),
            };

            let result = call_rpc(&cli.rpc_url, "health.ping.v1", params).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            let ping: PingResult =
                serde_json::from_value(result).context("Unexpected ping result")?;

            if !json {
                println!(
                    "{} {} ({})",
                    paint_status(&ping.status),
                    ping.executor_name.bold(),
                    ping.status_code
                );
                println!("  {}", ping.message);

                if let Some(results) = ping.thorough_results.filter(|r| !r.is_empty()) {
                    println!();
                    for (key, value) in results {
                        println!("  {} {}", format!("{}:", key).bold(), value);
                    }
                }
            }

            // Non-zero exit for anything a load balancer would not route to
            if ping.status_code != 200 {
                std::process::exit(1);
            }
        }

        Commands::History => {
            let result = call_rpc(&cli.rpc_url, "health.history.v1", json!({})).await?;
            let history: HistoryResult =
                serde_json::from_value(result).context("Unexpected history result")?;

            println!(
                "{}",
                format!(
                    "Last {} of {} runs kept (newest first)",
                    history.entries.len(),
                    history.capacity
                )
                .cyan()
                .bold()
            );
            println!();

            if history.entries.is_empty() {
                println!("{}", "No probe runs yet".yellow());
            } else {
                println!("{}", Table::new(history.entries));
            }
        }

        Commands::Maintenance {
            enable,
            disable: _,
            message,
        } => {
            let params = json!({ "enabled": enable, "message": message });

            let result = call_rpc(&cli.rpc_url, "admin.maintenance.v1", params).await?;
            let state: MaintenanceResult =
                serde_json::from_value(result).context("Unexpected maintenance result")?;

            if state.enabled {
                println!("{}", "✓ Maintenance mode enabled".yellow().bold());
                if let Some(message) = state.message {
                    println!("  {} {}", "Message:".bold(), message);
                }
            } else {
                println!("{}", "✓ Maintenance mode disabled".green().bold());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_accepts_level_and_json() {
        let cli = Cli::try_parse_from(["healthprobe", "ping", "--level", "3", "--json"]).unwrap();
        match cli.command {
            Commands::Ping { level, json } => {
                assert_eq!(level.as_deref(), Some("3"));
                assert!(json);
            }
            _ => panic!("expected ping"),
        }
    }

    #[test]
    fn test_rpc_url_flag_overrides_default() {
        let cli = Cli::try_parse_from([
            "healthprobe",
            "--rpc-url",
            "http://10.0.0.5:9630",
            "history",
        ])
        .unwrap();
        assert_eq!(cli.rpc_url, "http://10.0.0.5:9630");
        assert!(matches!(cli.command, Commands::History));
    }

    #[test]
    fn test_maintenance_enable_with_message() {
        let cli = Cli::try_parse_from([
            "healthprobe",
            "maintenance",
            "--enable",
            "--message",
            "Back at noon",
        ])
        .unwrap();
        match cli.command {
            Commands::Maintenance {
                enable, message, ..
            } => {
                assert!(enable);
                assert_eq!(message.as_deref(), Some("Back at noon"));
            }
            _ => panic!("expected maintenance"),
        }
    }

    #[test]
    fn test_maintenance_needs_exactly_one_mode() {
        assert!(Cli::try_parse_from(["healthprobe", "maintenance"]).is_err());
        assert!(
            Cli::try_parse_from(["healthprobe", "maintenance", "--enable", "--disable"]).is_err()
        );
        assert!(Cli::try_parse_from(["healthprobe", "maintenance", "--disable"]).is_ok());
    }

    #[test]
    fn test_message_requires_enable() {
        assert!(
            Cli::try_parse_from(["healthprobe", "maintenance", "--disable", "--message", "x"])
                .is_err()
        );
    }
}
