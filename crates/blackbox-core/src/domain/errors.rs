//! Domain error types
//!
//! Errors surfaced to the host application by subsystem initialization and
//! configuration. None of these are fatal to the host: a failed
//! initialization degrades the subsystem to "no reporting" and the process
//! keeps running.

use thiserror::Error;

/// Errors that can occur while setting up the crash capture subsystem.
#[derive(Debug, Error)]
pub enum CrashError {
    /// The reporting transport could not be provisioned. No hooks will
    /// produce reports, but the host process must still be allowed to run.
    #[error("Transport provisioning failed: {0}")]
    TransportUnavailable(String),

    /// A failure-detection hook could not be installed.
    #[error("Hook installation failed: {0}")]
    HookInstall(String),

    /// An operation required `configure()` to have run first.
    #[error("Known-failure set not configured")]
    NotConfigured,
}
