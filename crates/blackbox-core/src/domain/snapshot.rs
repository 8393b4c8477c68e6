//! Point-in-time diagnostic snapshot
//!
//! Resource facts sampled at the moment of a crash. Every counter is
//! optional: `None` is the sentinel for "unavailable on this platform or in
//! this process state", so sampling can always complete and report assembly
//! never blocks on a missing counter.

/// Resource counters sampled once per crash event.
///
/// Owned solely by the report assembly invocation that created it and
/// discarded after the annotation set is built.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSnapshot {
    /// Total physical memory in bytes.
    pub total_memory: Option<u64>,
    /// Physical memory in use system-wide, in bytes.
    pub used_memory: Option<u64>,
    /// Private memory of this process, in bytes.
    pub process_memory: Option<u64>,
    /// System-wide CPU utilization percentage (0.0 - 100.0).
    pub cpu_percent: Option<f64>,
    /// Running processes as (name, pid) pairs, capped by configuration.
    pub processes: Vec<(String, u32)>,
}

impl DiagnosticSnapshot {
    /// A snapshot with every counter unavailable.
    ///
    /// Used when sampling cannot run at all; report assembly still proceeds.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// True when no counter could be sampled.
    pub fn is_empty(&self) -> bool {
        self.total_memory.is_none()
            && self.used_memory.is_none()
            && self.process_memory.is_none()
            && self.cpu_percent.is_none()
            && self.processes.is_empty()
    }
}
