//! Manual call-stack capture and symbolization
//!
//! Rewinds the call stack from raw return addresses so the report carries a
//! usable stack even when a memory dump would be corrupt. Raw addresses are
//! captured through the platform port into a fixed-size buffer; each address
//! is then resolved to a symbol, best-effort.
//!
//! Frames are emitted **outer-to-inner**: the root of the call chain first,
//! the crash site last. A contiguous run of frames that fail symbolization
//! is coalesced into a single omitted-range marker attached to the next
//! successfully resolved frame, or dropped entirely if resolution never
//! recovers before the scan ends.

use std::sync::Arc;

use blackbox_core::domain::StackFrame;
use blackbox_core::ports::{Platform, MAX_RAW_FRAMES};

/// Resolved-name prefixes that mark a frame as runtime/standard-library
/// rather than application code. Affects report triage, not correctness.
const RUNTIME_PREFIXES: [&str; 5] = ["std::", "core::", "alloc::", "backtrace::", "__"];

/// Result of one stack capture.
#[derive(Debug)]
pub struct CapturedStack {
    /// Symbolized frames, outer-to-inner.
    pub frames: Vec<StackFrame>,
    /// Name of the innermost resolved function: the crash's short identifier.
    pub crashed_function: String,
}

impl CapturedStack {
    /// Serialize the frame sequence to a JSON array rendered as a string,
    /// the form embedded in the flat annotation map.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.frames).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Bounded, allocation-minimal stack unwinder.
#[derive(Clone)]
pub struct Unwinder {
    platform: Arc<dyn Platform>,
    max_frames: usize,
}

impl Unwinder {
    /// `max_frames` bounds the emitted sequence; it is clamped to the
    /// platform raw-capture ceiling.
    pub fn new(platform: Arc<dyn Platform>, max_frames: usize) -> Self {
        Self {
            platform,
            max_frames: max_frames.clamp(1, MAX_RAW_FRAMES),
        }
    }

    /// Capture and symbolize the current call stack.
    ///
    /// `skip` drops that many innermost raw frames before symbolization,
    /// letting callers hide their own entry into the crash path. Runs
    /// correctly with the heap in an inconsistent state: the raw walk uses
    /// a stack buffer and failed symbol lookups never raise.
    pub fn capture(&self, skip: usize) -> CapturedStack {
        let mut raw = [0usize; MAX_RAW_FRAMES];
        let captured = self.platform.raw_backtrace(&mut raw).min(MAX_RAW_FRAMES);

        let mut frames: Vec<StackFrame> = Vec::with_capacity(self.max_frames);
        let mut crashed_function = String::new();
        let mut pending_missing: Option<(u32, u32)> = None;
        let own_file = own_source_file();

        // Truncation keeps the innermost addresses: when the stack is deeper
        // than the frame limit it is the outer context that goes, never the
        // crash site.
        let end = captured.min(skip + self.max_frames);

        // Raw addresses are innermost-first; walk them in reverse so frames
        // come out outer-to-inner, with `scan_index` numbering the walk.
        let mut scan_index: u32 = 0;
        for i in (skip..end).rev() {
            let index = scan_index;
            scan_index += 1;

            let Some(symbol) = self.platform.resolve_symbol(raw[i]) else {
                pending_missing = Some(match pending_missing {
                    None => (index, index),
                    Some((first, _)) => (first, index),
                });
                continue;
            };

            // Frames from this file are self-reference noise, not context.
            if symbol.filename == own_file {
                continue;
            }

            let in_app = !RUNTIME_PREFIXES
                .iter()
                .any(|prefix| symbol.function.starts_with(prefix));

            let mut frame = StackFrame::new(
                symbol.function,
                symbol.filename,
                symbol.lineno,
                format!("{:#x}", raw[i]),
                format!("{:#x}", symbol.symbol_addr),
                in_app,
            );
            frame.frames_omitted = pending_missing.take();
            crashed_function = frame.function.clone();
            frames.push(frame);
        }

        CapturedStack {
            frames,
            crashed_function,
        }
    }
}

/// Basename of this source file, used to filter self-referential frames.
fn own_source_file() -> &'static str {
    file!().rsplit('/').next().unwrap_or(file!())
}
