// Probe constants (No magic values)
use std::time::Duration;

/// Default number of results kept by the historical probe
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Source name of the placeholder served before the first real probe run
pub const INITIAL_RESULT_NAME: &str = "init";

/// Message of the placeholder served before the first real probe run
pub const INITIAL_RESULT_MESSAGE: &str = "only for initialization";

/// Message reported while maintenance mode is on and no message was configured
pub const DEFAULT_MAINTENANCE_MESSAGE: &str = "System is in maintenance mode.";

/// Default connect timeout for TCP reachability probes (2s)
pub const DEFAULT_TCP_TIMEOUT: Duration = Duration::from_millis(2000);

/// CPU usage above which an extended system check reports a warning (percent)
pub const DEFAULT_CPU_WARN_PERCENT: f32 = 90.0;

/// Memory usage above which an extended system check reports a warning (percent)
pub const DEFAULT_MEMORY_WARN_PERCENT: f32 = 90.0;

/// Default RPC bind host (localhost only)
pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";

/// Default RPC port
pub const DEFAULT_RPC_PORT: u16 = 9630;
