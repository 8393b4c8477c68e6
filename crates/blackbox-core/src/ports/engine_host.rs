//! Engine host port (driven/secondary port)
//!
//! Interface to the third-party native engine embedded in the host process.
//! The engine itself is an external collaborator: this port only exposes
//! what report assembly and graceful shutdown need.
//!
//! ## Design Notes
//!
//! - Every accessor is called from inside an active crash path, so
//!   implementations must tolerate being invoked while the engine is in a
//!   degraded state and should avoid taking locks that application threads
//!   may be holding at crash time.
//! - `shutdown` uses `anyhow::Result` because failure details are
//!   adapter-specific; a shutdown error sends the caller down the full
//!   crash-reporting path.

/// Interface to the embedded native engine.
pub trait EngineHost: Send + Sync {
    /// Whether the engine is currently initialized.
    ///
    /// Queried during report assembly and by the process-exit observer: a
    /// still-initialized engine at exit time is a soft anomaly.
    fn is_initialized(&self) -> bool;

    /// Outstanding allocation/leak counter exposed by the engine.
    fn leak_count(&self) -> u64;

    /// Copy of the engine's error log queue.
    fn log_errors(&self) -> Vec<String>;

    /// Copy of the engine's warning log queue.
    fn log_warnings(&self) -> Vec<String>;

    /// Drain the engine's general log queue.
    ///
    /// Unlike the error and warning queues this consumes the entries, so it
    /// must only be called once per crash event.
    fn drain_log_general(&self) -> Vec<String>;

    /// Best-effort engine shutdown, used by the known-failure graceful-exit
    /// path. An `Err` here makes the caller fall through to full crash
    /// reporting with the original message, exactly once.
    fn shutdown(&self) -> anyhow::Result<()>;
}
