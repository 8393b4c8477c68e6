//! Blackbox Core - Domain logic and port definitions
//!
//! This crate contains the platform-agnostic core of the crash capture
//! subsystem:
//! - **Domain entities** - `CrashEvent`, `DiagnosticSnapshot`, `StackFrame`,
//!   `KnownFailureSet`, `AnnotationMap`
//! - **Port definitions** - Traits for adapters: `EngineHost`, `Platform`,
//!   `ReportTransport`
//! - **Configuration** - Typed YAML configuration with validation
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure types with no OS dependencies. Ports
//! define trait interfaces that the capture and transport crates implement.
//! Nothing in this crate may allocate unboundedly or block, since its types
//! are used from inside an active crash path.

pub mod config;
pub mod domain;
pub mod ports;
