// Healthprobe Infrastructure - Concrete Probes
// Implements: Probe (system resources, TCP reachability)

pub mod system_resource_probe;
pub mod tcp_probe;

pub use system_resource_probe::{ResourceSnapshot, SystemResourceProbe};
pub use tcp_probe::TcpConnectProbe;
