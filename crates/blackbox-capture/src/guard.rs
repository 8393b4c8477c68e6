//! Crash-during-crash re-entrancy guard
//!
//! A single process-wide tagged flag prevents crash handling from
//! re-entering itself. Any thread that detects a crash while another crash
//! is already being handled must escalate to unconditional abort instead of
//! waiting: waiting risks deadlock against a corrupted heap.
//!
//! The guard is a tagged atomic with explicit compare-and-set transitions
//! rather than a bare boolean, so the re-entrancy contract is auditable and
//! testable in isolation.

use std::sync::atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const HANDLING: u8 = 1;
const ABORTING: u8 = 2;

/// Result of attempting to enter the crash-handling critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEntry {
    /// This caller owns crash handling; it must call
    /// [`ReentrancyGuard::finish`] if the process survives.
    Acquired,
    /// A crash is already being handled (or an abort is already underway).
    /// The caller must abort immediately, with no further report attempt.
    Escalate,
}

/// Process-wide crash-handling state flag.
///
/// States: `Idle` → `Handling` → (`Idle` on a non-aborting report, or
/// `Aborting` once escalation is recorded). Lock-free on purpose: it is
/// touched from signal handlers and from threads whose heap may be corrupt.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    state: AtomicU8,
}

impl ReentrancyGuard {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    /// Try to enter crash handling.
    ///
    /// Exactly one caller per crash observes [`GuardEntry::Acquired`]; every
    /// concurrent or recursive caller observes [`GuardEntry::Escalate`] and
    /// must abort without assembling a second report.
    pub fn enter(&self) -> GuardEntry {
        match self
            .state
            .compare_exchange(IDLE, HANDLING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => GuardEntry::Acquired,
            Err(_) => {
                // Record that an escalation happened; the state never
                // returns to Idle once a double crash has been seen.
                self.state.store(ABORTING, Ordering::Release);
                GuardEntry::Escalate
            }
        }
    }

    /// Release the guard after a non-aborting report (soft anomaly paths).
    ///
    /// Only valid for the caller that observed `Acquired`. A guard that has
    /// escalated stays in the aborting state.
    pub fn finish(&self) {
        let _ = self
            .state
            .compare_exchange(HANDLING, IDLE, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Whether a crash is currently being handled or escalation occurred.
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) != IDLE
    }
}
