//! Point-in-time resource sampling
//!
//! Pure reads of OS resource counters, executed only inside the crash path
//! (single-threaded by contract). Sampling never returns an error: any
//! counter that cannot be read becomes a `None` sentinel so report assembly
//! never blocks on this step.

use blackbox_core::domain::DiagnosticSnapshot;
use sysinfo::System;

/// Samples memory, CPU, and the process table once per crash event.
#[derive(Debug)]
pub struct MetricsProbe {
    /// Upper bound on entries in the process enumeration.
    process_list_cap: usize,
}

impl MetricsProbe {
    pub fn new(process_list_cap: usize) -> Self {
        Self { process_list_cap }
    }

    /// Sample the current resource counters, best-effort.
    ///
    /// CPU utilization needs two readings separated by the sampler's minimum
    /// interval; the wait is bounded and acceptable on a path that runs once
    /// per process lifetime.
    pub fn sample(&self) -> DiagnosticSnapshot {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        sys.refresh_processes();

        let total_memory = match sys.total_memory() {
            0 => None,
            bytes => Some(bytes),
        };
        let used_memory = match sys.used_memory() {
            0 => None,
            bytes => Some(bytes),
        };

        let process_memory = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .map(|process| process.memory());

        let cpu_percent = Some(f64::from(sys.global_cpu_info().cpu_usage()));

        let mut processes: Vec<(String, u32)> = sys
            .processes()
            .iter()
            .take(self.process_list_cap)
            .map(|(pid, process)| (process.name().to_string(), pid.as_u32()))
            .collect();
        processes.sort_by(|a, b| a.1.cmp(&b.1));

        DiagnosticSnapshot {
            total_memory,
            used_memory,
            process_memory,
            cpu_percent,
            processes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reads_memory_counters() {
        let probe = MetricsProbe::new(8);
        let snapshot = probe.sample();
        assert!(snapshot.total_memory.is_some());
        assert!(snapshot.used_memory.is_some());
        assert!(snapshot.process_memory.is_some());
    }

    #[test]
    fn sample_caps_process_enumeration() {
        let probe = MetricsProbe::new(3);
        let snapshot = probe.sample();
        assert!(snapshot.processes.len() <= 3);
    }

    #[test]
    fn sample_includes_cpu_reading() {
        let probe = MetricsProbe::new(1);
        let snapshot = probe.sample();
        let cpu = snapshot.cpu_percent.expect("cpu reading");
        assert!(cpu >= 0.0);
    }
}
