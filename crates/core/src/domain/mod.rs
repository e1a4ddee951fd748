// Domain Layer - Probe value types

pub mod error;
pub mod level;
pub mod result;
pub mod status;

// Re-exports
pub use error::DomainError;
pub use level::ProbeLevel;
pub use result::{ProbeExtras, ProbeResult};
pub use status::ProbeStatus;
