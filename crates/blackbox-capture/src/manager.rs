//! Crash handler registry and orchestration
//!
//! `CrashManager` owns every failure-detection hook (panic hook, fault
//! signals, process-exit observer, the engine's fatal callback) and drives
//! each detected event through the same pipeline: re-entrancy guard, report
//! assembly, transport hand-off, termination policy.
//!
//! The manager is installed into a process-global slot once; the installed
//! hooks reach it through that slot because signal handlers and the panic
//! hook cannot carry instance state. The exit paths (`handle_crash`,
//! `on_engine_fatal`, the signal handler) are thin wrappers around
//! `process_crash` and `process_engine_fatal`, which do everything except
//! terminate so the pipeline stays testable.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Instant;

use tracing::{debug, info, warn};

use blackbox_core::config::Config;
use blackbox_core::domain::{
    Classification, CrashEvent, CrashError, DiagnosticSnapshot, KnownFailureSet,
};
use blackbox_core::ports::{EngineHost, Platform, ReportTransport};

use crate::assembler::build_report;
use crate::guard::{GuardEntry, ReentrancyGuard};
use crate::logs::DiagnosticLogs;
use crate::probe::MetricsProbe;
use crate::unwinder::{CapturedStack, Unwinder};

/// Process-global manager slot, reached by the panic hook, the fault-signal
/// handler, and the exit observer.
static GLOBAL: OnceLock<Arc<CrashManager>> = OnceLock::new();

/// Result of driving one event through the reporting pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashOutcome {
    /// The report was assembled and handed to the transport (possibly
    /// partially; transport errors are logged, not propagated).
    Reported,
    /// A crash was already being handled. No report was attempted; the
    /// caller must terminate the process immediately.
    Escalated,
}

/// Disposition of the engine's fatal callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFatalOutcome {
    /// Known failure, engine shut down cleanly: exit with success, no report.
    GracefulExit,
    /// Full reporting ran (unknown failure, or graceful shutdown failed).
    Reported(CrashOutcome),
}

/// Owns failure detection and crash reporting for the whole process.
pub struct CrashManager {
    config: Config,
    engine: Arc<dyn EngineHost>,
    transport: Arc<dyn ReportTransport>,
    platform: Arc<dyn Platform>,
    logs: Arc<DiagnosticLogs>,
    known_failures: RwLock<KnownFailureSet>,
    guard: ReentrancyGuard,
    unwinder: Unwinder,
    probe: MetricsProbe,
    started_at: Instant,
}

impl CrashManager {
    pub fn new(
        config: Config,
        engine: Arc<dyn EngineHost>,
        transport: Arc<dyn ReportTransport>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        let unwinder = Unwinder::new(Arc::clone(&platform), config.capture.max_frames);
        let probe = MetricsProbe::new(config.capture.process_list_cap);
        Self {
            config,
            engine,
            transport,
            platform,
            logs: Arc::new(DiagnosticLogs::new()),
            known_failures: RwLock::new(KnownFailureSet::new()),
            guard: ReentrancyGuard::new(),
            unwinder,
            probe,
            started_at: Instant::now(),
        }
    }

    /// The installed process-wide manager, if any.
    pub fn global() -> Option<Arc<CrashManager>> {
        GLOBAL.get().cloned()
    }

    /// Install this manager process-wide and register every detection hook.
    ///
    /// Returns [`CrashError::TransportUnavailable`] when the transport
    /// cannot be provisioned; nothing is installed in that case and the host
    /// decides whether to keep running without reporting. Idempotent on
    /// success: repeat calls on the already-installed manager return `Ok`.
    /// When a debugger is attached, hook installation is skipped entirely so
    /// the debugger sees faults first-hand.
    pub fn initialize(self: &Arc<Self>) -> Result<(), CrashError> {
        self.transport
            .provision()
            .map_err(|e| CrashError::TransportUnavailable(e.to_string()))?;

        if let Some(installed) = GLOBAL.get() {
            return if Arc::ptr_eq(installed, self) {
                Ok(())
            } else {
                Err(CrashError::HookInstall(
                    "another crash manager is already installed".to_string(),
                ))
            };
        }
        if GLOBAL.set(Arc::clone(self)).is_err() {
            return Err(CrashError::HookInstall(
                "another crash manager is already installed".to_string(),
            ));
        }

        if self.platform.debugger_attached() {
            info!("debugger attached, crash hooks not installed");
            return Ok(());
        }

        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            previous(panic_info);
            let Some(manager) = CrashManager::global() else {
                return;
            };
            // A panic raised inside a contained assembly step must be left
            // to that step's catch_unwind; the hook only terminates panics
            // that arrive outside an active report.
            if manager.crash_in_progress() {
                return;
            }
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| {
                    panic_info
                        .payload()
                        .downcast_ref::<String>()
                        .map(String::as_str)
                })
                .unwrap_or("panic");
            let reason = match panic_info.location() {
                Some(location) => format!("Panic: {payload} at {location}"),
                None => format!("Panic: {payload}"),
            };
            manager.handle_crash(&reason, true);
        }));

        self.platform
            .install_fault_handler()
            .map_err(|e| CrashError::HookInstall(e.to_string()))?;
        self.platform
            .install_exit_observer(exit_observer)
            .map_err(|e| CrashError::HookInstall(e.to_string()))?;

        debug!("crash hooks installed");
        Ok(())
    }

    /// Load the known-failure patterns from the configuration. Safe to call
    /// again; the set is replaced wholesale.
    pub fn configure(&self) {
        let set = KnownFailureSet::from_patterns(self.config.known_failures.iter().cloned());
        debug!(patterns = set.len(), "known-failure set configured");
        if let Ok(mut known) = self.known_failures.write() {
            *known = set;
        }
    }

    /// The diagnostic log family (breadcrumbs, warnings, engine mirror).
    pub fn logs(&self) -> &Arc<DiagnosticLogs> {
        &self.logs
    }

    /// Whether a crash report is currently being assembled (or an abort is
    /// already underway). The panic hook stands down while this holds.
    pub fn crash_in_progress(&self) -> bool {
        self.guard.is_active()
    }

    pub fn add_breadcrumb(&self, message: impl Into<String>) {
        self.logs.add_breadcrumb(message);
    }

    pub fn add_warning(&self, message: impl Into<String>) {
        self.logs.add_warning(message);
    }

    pub fn clear_breadcrumbs(&self) {
        self.logs.clear_breadcrumbs();
    }

    pub fn mirror_engine_line(&self, line: impl Into<String>) {
        self.logs.mirror_engine_line(line);
    }

    /// Entry point for the engine's fatal-error callback. Never returns.
    ///
    /// `raw_message` is the engine's unformatted failure string and drives
    /// known-failure classification; `formatted` is what a report carries.
    pub fn on_engine_fatal(&self, raw_message: &str, formatted: &str) -> ! {
        match self.process_engine_fatal(raw_message, formatted) {
            EngineFatalOutcome::GracefulExit => std::process::exit(0),
            EngineFatalOutcome::Reported(_) => std::process::abort(),
        }
    }

    /// Report a failure detected by the host itself.
    ///
    /// With `should_abort` the process terminates after the report is handed
    /// off; without it the call returns and the process keeps running (soft
    /// anomalies). An escalated re-entrant call aborts unconditionally.
    pub fn handle_crash(&self, reason: &str, should_abort: bool) {
        let event = CrashEvent::new(reason, None, should_abort, self.started_at.elapsed());
        let outcome = self.process_crash(event);
        if should_abort || outcome == CrashOutcome::Escalated {
            std::process::abort();
        }
    }

    /// Process-exit observer body: a still-initialized engine at normal exit
    /// time is a soft anomaly worth a report, but not worth an abort.
    pub fn handle_exit(&self) {
        let initialized =
            panic::catch_unwind(AssertUnwindSafe(|| self.engine.is_initialized()))
                .unwrap_or(false);
        if !initialized {
            return;
        }
        warn!("engine still initialized at process exit");
        let event = CrashEvent::new("AtExit", None, false, self.started_at.elapsed());
        let _ = self.process_crash(event);
    }

    /// Classification and reporting for the engine fatal path, minus the
    /// terminating syscall.
    ///
    /// A known failure gets a graceful engine shutdown and no report; if that
    /// shutdown fails, the event falls through to full reporting with the
    /// original message, exactly once.
    pub fn process_engine_fatal(&self, raw_message: &str, formatted: &str) -> EngineFatalOutcome {
        let classification = self
            .known_failures
            .read()
            .map(|known| known.classify(raw_message))
            .unwrap_or(Classification::Unhandled);

        if classification == Classification::Handled {
            info!(raw = raw_message, "known failure, shutting down engine");
            match self.engine.shutdown() {
                Ok(()) => return EngineFatalOutcome::GracefulExit,
                Err(e) => {
                    warn!(error = %e, "graceful shutdown failed, reporting after all");
                }
            }
        }

        let event = self.aborting_event(formatted, Some(raw_message.to_string()));
        EngineFatalOutcome::Reported(self.process_crash(event))
    }

    /// Drive one event through the guard, assembly, and transport, without
    /// terminating the process.
    ///
    /// On escalation nothing is assembled. On an aborting event the guard is
    /// deliberately left held: the process is about to die, and releasing it
    /// would let a racing fault start a second report. Non-aborting events
    /// (the exit observer) release it on the way out.
    pub fn process_crash(&self, event: CrashEvent) -> CrashOutcome {
        if self.guard.enter() == GuardEntry::Escalate {
            return CrashOutcome::Escalated;
        }

        let snapshot = panic::catch_unwind(AssertUnwindSafe(|| self.probe.sample()))
            .unwrap_or_else(|_| DiagnosticSnapshot::unavailable());
        let stack = panic::catch_unwind(AssertUnwindSafe(|| self.unwinder.capture(0)))
            .unwrap_or_else(|_| CapturedStack {
                frames: Vec::new(),
                crashed_function: String::new(),
            });
        let hostname = self.platform.hostname();

        let report = build_report(
            &event,
            self.engine.as_ref(),
            &snapshot,
            &stack,
            &self.logs,
            hostname.as_deref(),
        );

        // Re-provision right before hand-off; the startup provisioning may
        // have gone stale over a long process lifetime.
        if let Err(e) = self.transport.provision() {
            warn!(error = %e, "transport re-provisioning failed");
        }
        match self.transport.submit(&report) {
            Ok(()) => info!(reason = event.reason(), "crash report submitted"),
            Err(e) => warn!(error = %e, "crash report submission failed"),
        }

        if !event.should_abort() {
            self.guard.finish();
        }
        CrashOutcome::Reported
    }

    fn aborting_event(&self, reason: &str, raw_message: Option<String>) -> CrashEvent {
        CrashEvent::new(reason, raw_message, true, self.started_at.elapsed())
    }
}

/// Fault-signal entry, called from the platform signal handler. Returns so
/// the handler can restore the default disposition and re-raise.
pub(crate) fn fault_signal_entry(signo: libc::c_int) {
    let Some(manager) = CrashManager::global() else {
        return;
    };
    let reason = signal_reason(signo);
    let event = CrashEvent::new(reason, None, true, manager.started_at.elapsed());
    let _ = manager.process_crash(event);
}

/// Exit observer registered with the platform at initialization.
extern "C" fn exit_observer() {
    if let Some(manager) = CrashManager::global() {
        manager.handle_exit();
    }
}

/// Static reason string for a fault signal. No allocation: this runs inside
/// the signal handler before any report machinery.
fn signal_reason(signo: libc::c_int) -> &'static str {
    match signo {
        libc::SIGSEGV => "Fault: SIGSEGV",
        libc::SIGBUS => "Fault: SIGBUS",
        libc::SIGILL => "Fault: SIGILL",
        libc::SIGFPE => "Fault: SIGFPE",
        libc::SIGABRT => "Fault: SIGABRT",
        _ => "Fault: unknown signal",
    }
}
