// Port Layer - Interfaces for external dependencies

pub mod probe;

// Re-exports
pub use probe::{Probe, ProbeError, ProbeOutcome, Sample};
