//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! crash capture core. Ports are interfaces that the subsystem depends on,
//! but whose implementations live elsewhere.
//!
//! ## Ports Overview
//!
//! - [`EngineHost`] - The embedded native engine (lifecycle, log queues, leaks)
//! - [`Platform`] - OS-specific fault hooks, raw backtraces, symbol resolution
//! - [`ReportTransport`] - The external reporting channel

pub mod engine_host;
pub mod platform;
pub mod transport;

pub use engine_host::EngineHost;
pub use platform::{Platform, ResolvedSymbol, MAX_RAW_FRAMES};
pub use transport::ReportTransport;
