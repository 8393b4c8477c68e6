//! Platform capability port (driven/secondary port)
//!
//! Abstracts every OS-specific primitive the subsystem needs: fault-signal
//! hooks, process-exit observation, debugger detection, raw backtrace
//! capture, and symbol resolution. One implementation exists per target OS;
//! everything above this port is platform-agnostic.
//!
//! ## Design Notes
//!
//! - `raw_backtrace` writes into a caller-provided fixed-size buffer and is
//!   expected to work with the heap in an inconsistent state: no allocation,
//!   no locking, no unwinding.
//! - `resolve_symbol` may allocate (symbol names are strings) and may fail
//!   per-frame; the unwinder coalesces failed frames into omitted ranges
//!   rather than treating them as errors.

/// Upper bound on raw return addresses captured in one walk.
///
/// Platform backtrace primitives cap the sum of skipped and captured frames
/// below 63; staying at 62 keeps every target inside that limit.
pub const MAX_RAW_FRAMES: usize = 62;

/// A successfully resolved symbol for one instruction address.
#[derive(Debug, Clone)]
pub struct ResolvedSymbol {
    /// Demangled function name.
    pub function: String,
    /// Source file basename, empty when line info is missing.
    pub filename: String,
    /// Line number, 0 when line info is missing.
    pub lineno: u32,
    /// Base address of the containing symbol.
    pub symbol_addr: usize,
}

/// OS capability interface.
pub trait Platform: Send + Sync {
    /// Install process-wide handlers for synchronous fault signals
    /// (segmentation faults, illegal instructions, FP errors, aborts).
    ///
    /// Installed exactly once per process; there is no unregistration path.
    fn install_fault_handler(&self) -> anyhow::Result<()>;

    /// Register `observer` to run on normal process exit.
    fn install_exit_observer(&self, observer: extern "C" fn()) -> anyhow::Result<()>;

    /// Whether a debugger is attached to this process. Fault hooks are not
    /// installed under a debugger so it can see the original fault.
    fn debugger_attached(&self) -> bool;

    /// Capture raw return addresses into `out`, innermost frame first.
    /// Returns the number of addresses written, at most `out.len()`.
    fn raw_backtrace(&self, out: &mut [usize]) -> usize;

    /// Resolve one instruction address to a symbol, best-effort.
    fn resolve_symbol(&self, addr: usize) -> Option<ResolvedSymbol>;

    /// Host/computer name for report identity, when available.
    fn hostname(&self) -> Option<String>;
}
