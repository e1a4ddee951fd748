// Health Configuration
// Environment-driven settings, resolved once by the composition root

use crate::application::constants::{
    DEFAULT_CPU_WARN_PERCENT, DEFAULT_HISTORY_SIZE, DEFAULT_MEMORY_WARN_PERCENT,
    DEFAULT_RPC_HOST, DEFAULT_RPC_PORT, DEFAULT_TCP_TIMEOUT,
};
use crate::domain::ProbeLevel;
use crate::error::{AppError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_RPC_HOST: &str = "HEALTHPROBE_RPC_HOST";
pub const ENV_RPC_PORT: &str = "HEALTHPROBE_RPC_PORT";
pub const ENV_HISTORY_SIZE: &str = "HEALTHPROBE_HISTORY_SIZE";
pub const ENV_DEFAULT_LEVEL: &str = "HEALTHPROBE_DEFAULT_LEVEL";
pub const ENV_MAINTENANCE: &str = "HEALTHPROBE_MAINTENANCE";
pub const ENV_MAINTENANCE_MESSAGE: &str = "HEALTHPROBE_MAINTENANCE_MESSAGE";
pub const ENV_TCP_TARGET: &str = "HEALTHPROBE_TCP_TARGET";
pub const ENV_TCP_TIMEOUT_MS: &str = "HEALTHPROBE_TCP_TIMEOUT_MS";
pub const ENV_CPU_WARN_PERCENT: &str = "HEALTHPROBE_CPU_WARN_PERCENT";
pub const ENV_MEMORY_WARN_PERCENT: &str = "HEALTHPROBE_MEMORY_WARN_PERCENT";

/// Health service configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub rpc_host: String,
    pub rpc_port: u16,

    /// Number of results the historical probe keeps (>= 1)
    pub history_size: usize,

    /// Level used when a request does not name one
    pub default_level: ProbeLevel,

    /// Start in maintenance mode
    pub maintenance: bool,
    pub maintenance_message: Option<String>,

    /// `host:port` checked by the TCP probe; system resources are probed when unset
    pub tcp_target: Option<String>,
    pub tcp_timeout: Duration,

    pub cpu_warn_percent: f32,
    pub memory_warn_percent: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            rpc_host: DEFAULT_RPC_HOST.to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            history_size: DEFAULT_HISTORY_SIZE,
            default_level: ProbeLevel::Basic,
            maintenance: false,
            maintenance_message: None,
            tcp_target: None,
            tcp_timeout: DEFAULT_TCP_TIMEOUT,
            cpu_warn_percent: DEFAULT_CPU_WARN_PERCENT,
            memory_warn_percent: DEFAULT_MEMORY_WARN_PERCENT,
        }
    }
}

impl HealthConfig {
    /// Load from `HEALTHPROBE_*` environment variables, defaults for unset ones
    ///
    /// # Errors
    /// `AppError::Config` when a variable is set to an unusable value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let history_size = parse_or(&get, ENV_HISTORY_SIZE, defaults.history_size)?;
        if history_size == 0 {
            return Err(AppError::Config(format!(
                "{} must be at least 1",
                ENV_HISTORY_SIZE
            )));
        }

        let default_level = match get(ENV_DEFAULT_LEVEL) {
            Some(raw) => raw
                .parse::<ProbeLevel>()
                .map_err(|e| AppError::Config(format!("{}: {}", ENV_DEFAULT_LEVEL, e)))?,
            None => defaults.default_level,
        };

        let maintenance = match get(ENV_MAINTENANCE) {
            Some(raw) => parse_flag(ENV_MAINTENANCE, &raw)?,
            None => defaults.maintenance,
        };

        let tcp_timeout_ms: u64 = parse_or(
            &get,
            ENV_TCP_TIMEOUT_MS,
            defaults.tcp_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            rpc_host: get(ENV_RPC_HOST).unwrap_or(defaults.rpc_host),
            rpc_port: parse_or(&get, ENV_RPC_PORT, defaults.rpc_port)?,
            history_size,
            default_level,
            maintenance,
            maintenance_message: get(ENV_MAINTENANCE_MESSAGE),
            tcp_target: get(ENV_TCP_TARGET),
            tcp_timeout: Duration::from_millis(tcp_timeout_ms),
            cpu_warn_percent: parse_or(&get, ENV_CPU_WARN_PERCENT, defaults.cpu_warn_percent)?,
            memory_warn_percent: parse_or(
                &get,
                ENV_MEMORY_WARN_PERCENT,
                defaults.memory_warn_percent,
            )?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{}: invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("{}: invalid flag '{}'", key, raw))),
    }
}
