// Application Layer - Probe coordination

pub mod constants;
pub mod guard;
pub mod historical;
pub mod maintenance;
pub mod single_flight;

// Re-exports
pub use guard::{execute_guarded, execute_probe, execute_probe_sample, GuardResult};
pub use historical::HistoricalProbe;
pub use maintenance::MaintenanceSwitch;
pub use single_flight::SingleFlightProbe;
