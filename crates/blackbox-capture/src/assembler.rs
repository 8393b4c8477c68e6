//! Report assembly
//!
//! Merges the crash event, resource snapshot, unwound stack, and diagnostic
//! logs into the flat annotation map handed to the transport. Every
//! collection step independently swallows its own failure and substitutes a
//! sentinel or empty value: a partial report is strictly preferred over no
//! report, and assembly itself never raises.

use std::panic::{self, AssertUnwindSafe};

use blackbox_core::domain::{AnnotationMap, CrashEvent, DiagnosticSnapshot};
use blackbox_core::ports::EngineHost;

use crate::format::{percent_of, pretty_bytes};
use crate::logs::DiagnosticLogs;
use crate::unwinder::CapturedStack;

/// Sentinel value for a collection step that could not complete.
const UNAVAILABLE: &str = "unavailable";

/// Build the flat annotation set for one crash event.
///
/// The caller (the crash manager) runs the probe and the unwinder and feeds
/// their results here; engine accessors are invoked through this function
/// and are individually contained, since the engine may be in an arbitrary
/// state at crash time. Always returns a non-empty map containing at least
/// the crash reason.
pub fn build_report(
    event: &CrashEvent,
    engine: &dyn EngineHost,
    snapshot: &DiagnosticSnapshot,
    stack: &CapturedStack,
    logs: &DiagnosticLogs,
    hostname: Option<&str>,
) -> AnnotationMap {
    let mut annotations = AnnotationMap::new();

    annotations.insert("Crash reason", event.reason());
    if let Some(raw) = event.raw_message() {
        annotations.insert("Raw message", raw);
    }
    annotations.insert("Time elapsed", format!("{}s", event.elapsed().as_secs()));

    // Engine lifecycle and allocation counters
    annotations.insert(
        "Status",
        contained(engine, |e| {
            if e.is_initialized() {
                "initialized".to_string()
            } else {
                "shutdown".to_string()
            }
        }),
    );
    annotations.insert(
        "Leaks",
        contained(engine, |e| e.leak_count().to_string()),
    );

    // Resource counters, rendered human-readable
    annotations.insert(
        "Total memory",
        snapshot
            .total_memory
            .map(pretty_bytes)
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
    );
    annotations.insert(
        "Total used memory",
        render_with_share(snapshot.used_memory, snapshot.total_memory),
    );
    annotations.insert(
        "Process memory",
        render_with_share(snapshot.process_memory, snapshot.total_memory),
    );
    annotations.insert(
        "CPU usage",
        snapshot
            .cpu_percent
            .map(|cpu| format!("{}%", cpu as i64))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
    );
    annotations.insert("Process list", render_process_list(&snapshot.processes));

    // Manually rewound call stack
    annotations.insert("Manual callstack", stack.to_json_string());
    if !stack.crashed_function.is_empty() {
        annotations.insert("Crashed function", stack.crashed_function.as_str());
    }

    // Engine log queues (general is drained, errors/warnings are copied)
    annotations.insert(
        "Engine errors",
        contained(engine, |e| render_lines(&e.log_errors())),
    );
    annotations.insert(
        "Engine warnings",
        contained(engine, |e| render_lines(&e.log_warnings())),
    );
    annotations.insert(
        "Engine log general",
        contained(engine, |e| render_lines(&e.drain_log_general())),
    );

    // Subsystem-side context buffers
    annotations.insert("Breadcrumbs", render_lines(&logs.snapshot_breadcrumbs()));
    annotations.insert("Warnings", render_lines(&logs.snapshot_warnings()));
    annotations.insert(
        "Engine log mirror",
        render_lines(&logs.snapshot_engine_mirror()),
    );

    annotations.insert("Computer name", hostname.unwrap_or(UNAVAILABLE));

    annotations
}

/// Run one engine accessor with failure containment.
fn contained<F>(engine: &dyn EngineHost, step: F) -> String
where
    F: FnOnce(&dyn EngineHost) -> String,
{
    panic::catch_unwind(AssertUnwindSafe(|| step(engine)))
        .unwrap_or_else(|_| UNAVAILABLE.to_string())
}

/// Render a byte counter together with its share of total memory.
fn render_with_share(value: Option<u64>, total: Option<u64>) -> String {
    match (value, total) {
        (Some(bytes), Some(total)) => {
            format!("{} - percentage: {}", pretty_bytes(bytes), percent_of(bytes, total))
        }
        (Some(bytes), None) => pretty_bytes(bytes),
        (None, _) => UNAVAILABLE.to_string(),
    }
}

/// Render a string sequence as a JSON array value.
fn render_lines(lines: &[String]) -> String {
    serde_json::to_string_pretty(lines).unwrap_or_else(|_| "[]".to_string())
}

/// Render the (name, pid) process enumeration as a JSON object value.
fn render_process_list(processes: &[(String, u32)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = processes
        .iter()
        .map(|(name, pid)| {
            (
                format!("{name} ({pid})"),
                serde_json::Value::String(pid.to_string()),
            )
        })
        .collect();
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
}
