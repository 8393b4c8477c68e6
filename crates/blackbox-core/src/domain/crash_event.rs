//! Crash event entity
//!
//! A `CrashEvent` represents one detected failure instance. It is created
//! exactly once per real crash, is immutable after construction, and lives
//! only for the duration of report assembly.

use std::time::Duration;

/// A detected failure instance.
///
/// `reason` is the human-readable description that ends up in the report.
/// `raw_message` carries the unformatted, low-level failure string when one
/// exists (the engine's fatal callback provides one; panic hooks and fault
/// signals do not). `should_abort` decides whether the process must terminate
/// after the report has been handed to the transport.
#[derive(Debug, Clone)]
pub struct CrashEvent {
    reason: String,
    raw_message: Option<String>,
    should_abort: bool,
    elapsed: Duration,
}

impl CrashEvent {
    /// Create a new crash event.
    ///
    /// `elapsed` is the process runtime at the moment of detection, measured
    /// from subsystem initialization.
    pub fn new(
        reason: impl Into<String>,
        raw_message: Option<String>,
        should_abort: bool,
        elapsed: Duration,
    ) -> Self {
        Self {
            reason: reason.into(),
            raw_message,
            should_abort,
            elapsed,
        }
    }

    /// Human-readable crash reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The raw, pre-formatting failure message, when one exists.
    pub fn raw_message(&self) -> Option<&str> {
        self.raw_message.as_deref()
    }

    /// Whether the process must terminate after handling.
    pub fn should_abort(&self) -> bool {
        self.should_abort
    }

    /// Process runtime at the moment of detection.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_preserves_fields() {
        let event = CrashEvent::new(
            "Direct call to handle_crash",
            Some("raw %s".to_string()),
            true,
            Duration::from_secs(42),
        );
        assert_eq!(event.reason(), "Direct call to handle_crash");
        assert_eq!(event.raw_message(), Some("raw %s"));
        assert!(event.should_abort());
        assert_eq!(event.elapsed().as_secs(), 42);
    }

    #[test]
    fn event_without_raw_message() {
        let event = CrashEvent::new("AtExit", None, false, Duration::ZERO);
        assert!(event.raw_message().is_none());
        assert!(!event.should_abort());
    }
}
