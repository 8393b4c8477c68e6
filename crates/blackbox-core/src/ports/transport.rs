//! Report transport port (driven/secondary port)
//!
//! The external delivery mechanism that persists/uploads assembled reports.
//! The exact wire format is owned by the transport; this port only carries
//! the flat annotation record across the boundary.
//!
//! ## Design Notes
//!
//! - `provision` is called at initialization and again after each report is
//!   assembled, because an earlier provisioning may have gone stale by the
//!   time the process is about to die. Implementations must be idempotent.
//! - Both operations use `anyhow::Result`; callers in the crash path log
//!   failures and continue rather than propagating them.

use crate::domain::AnnotationMap;

/// External reporting channel.
pub trait ReportTransport: Send + Sync {
    /// Establish (or re-establish) the local report database and background
    /// capture agent. Idempotent on success.
    fn provision(&self) -> anyhow::Result<()>;

    /// Hand the flat annotation record to the transport immediately before
    /// the process is allowed to terminate.
    fn submit(&self, annotations: &AnnotationMap) -> anyhow::Result<()>;
}
