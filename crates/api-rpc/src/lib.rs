//! JSON-RPC API Layer
//!
//! Exposes the probe chain over JSON-RPC 2.0 (HTTP on localhost).

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
