//! Domain entities for crash capture
//!
//! This module contains the core domain types:
//! - Crash events and their lifecycle
//! - Point-in-time diagnostic snapshots
//! - Unwound stack frames
//! - The known-failure classification set
//! - The flat annotation map handed to the transport
//! - Domain-specific error types

pub mod annotations;
pub mod crash_event;
pub mod errors;
pub mod known_failures;
pub mod snapshot;
pub mod stack_frame;

// Re-export commonly used types
pub use annotations::AnnotationMap;
pub use crash_event::CrashEvent;
pub use errors::CrashError;
pub use known_failures::{Classification, KnownFailureSet};
pub use snapshot::DiagnosticSnapshot;
pub use stack_frame::StackFrame;
