//! Append-only diagnostic logs
//!
//! Three independent instances of the same contract share this struct:
//! breadcrumbs (developer-supplied trace messages), warnings, and a mirror
//! of the engine's log output. Appends are the only steady-state concurrent
//! writes in the subsystem; all mutation is serialized through one mutex
//! shared across the log family so a report snapshot is consistent with
//! concurrent producers.
//!
//! Growth is unbounded by design; that is an accepted resource trade-off
//! for process-lifetime context buffers.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct LogBuffers {
    breadcrumbs: Vec<String>,
    warnings: Vec<String>,
    engine_mirror: Vec<String>,
}

/// The breadcrumb/warning/engine-mirror log family.
#[derive(Debug, Default)]
pub struct DiagnosticLogs {
    inner: Mutex<LogBuffers>,
}

impl DiagnosticLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a breadcrumb. Thread-safe, O(1) amortized.
    pub fn add_breadcrumb(&self, message: impl Into<String>) {
        if let Ok(mut buffers) = self.inner.lock() {
            buffers.breadcrumbs.push(message.into());
        }
    }

    /// Record a warning. Thread-safe, O(1) amortized.
    pub fn add_warning(&self, message: impl Into<String>) {
        if let Ok(mut buffers) = self.inner.lock() {
            buffers.warnings.push(message.into());
        }
    }

    /// Mirror one line of the engine's log output.
    pub fn mirror_engine_line(&self, line: impl Into<String>) {
        if let Ok(mut buffers) = self.inner.lock() {
            buffers.engine_mirror.push(line.into());
        }
    }

    /// Copy of the breadcrumb sequence in insertion order.
    pub fn snapshot_breadcrumbs(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|b| b.breadcrumbs.clone())
            .unwrap_or_default()
    }

    /// Copy of the warning sequence in insertion order.
    pub fn snapshot_warnings(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|b| b.warnings.clone())
            .unwrap_or_default()
    }

    /// Copy of the mirrored engine log in insertion order.
    pub fn snapshot_engine_mirror(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|b| b.engine_mirror.clone())
            .unwrap_or_default()
    }

    /// Reset the breadcrumb log. Only breadcrumbs are clearable; warnings
    /// and the engine mirror persist for the process lifetime.
    pub fn clear_breadcrumbs(&self) {
        if let Ok(mut buffers) = self.inner.lock() {
            buffers.breadcrumbs.clear();
        }
    }
}
