//! Blackbox Capture - Crash detection and diagnostic reporting
//!
//! Provides:
//! - `CrashManager`: installs and owns every failure-detection hook
//! - `DiagnosticLogs`: breadcrumbs, warnings, and the engine-log mirror
//! - `MetricsProbe`: point-in-time resource sampling
//! - `Unwinder`: manual, bounded call-stack capture and symbolization
//! - `ReentrancyGuard`: the crash-during-crash escalation flag
//! - `UnixPlatform`: the Unix implementation of the platform port
//!
//! The subsystem is a background safety net: it produces no interactive
//! output, and its only visible effect is a terminated process and, later,
//! an uploaded report. Everything on the crash path is written to operate
//! in a degraded process state: bounded buffers, no lock shared with
//! application threads, and per-step failure containment during report
//! assembly.

pub mod assembler;
pub mod format;
pub mod guard;
pub mod logs;
pub mod manager;
pub mod platform;
pub mod probe;
pub mod unwinder;

pub use assembler::build_report;
pub use format::pretty_bytes;
pub use guard::{GuardEntry, ReentrancyGuard};
pub use logs::DiagnosticLogs;
pub use manager::{CrashManager, CrashOutcome, EngineFatalOutcome};
pub use platform::UnixPlatform;
pub use probe::MetricsProbe;
pub use unwinder::{CapturedStack, Unwinder};
