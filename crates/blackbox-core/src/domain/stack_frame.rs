//! Unwound stack frame entity
//!
//! One resolved frame of the manually rewound call stack. Frame sequences
//! are always emitted **outer-to-inner**: the root of the call chain comes
//! first and the crash site last. Consumers (the report assembler and the
//! transport record) rely on that order.

use serde::{Deserialize, Serialize};

/// One unwound and symbolized stack frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrame {
    /// Resolved function name.
    pub function: String,
    /// Source file name (basename, not the full path).
    pub filename: String,
    /// Line number within the source file.
    pub lineno: u32,
    /// Instruction address, rendered as a lowercase hex string.
    pub instruction_addr: String,
    /// Symbol base address, rendered as a lowercase hex string.
    pub symbol_addr: String,
    /// False for runtime/standard-library frames; affects report triage only.
    pub in_app: bool,
    /// When present, a contiguous run of frames immediately preceding this
    /// one failed symbolization. The pair is (first, last) frame index of
    /// the omitted run in emitted order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames_omitted: Option<(u32, u32)>,
}

impl StackFrame {
    /// Create a frame with no omitted-range marker.
    pub fn new(
        function: impl Into<String>,
        filename: impl Into<String>,
        lineno: u32,
        instruction_addr: impl Into<String>,
        symbol_addr: impl Into<String>,
        in_app: bool,
    ) -> Self {
        Self {
            function: function.into(),
            filename: filename.into(),
            lineno,
            instruction_addr: instruction_addr.into(),
            symbol_addr: symbol_addr.into(),
            in_app,
            frames_omitted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_serializes_without_empty_omitted_marker() {
        let frame = StackFrame::new("main", "main.rs", 10, "0x1000", "0xff0", true);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["function"], "main");
        assert_eq!(json["lineno"], 10);
        assert!(json.get("frames_omitted").is_none());
    }

    #[test]
    fn frame_serializes_omitted_range() {
        let mut frame = StackFrame::new("render", "scene.rs", 88, "0x2000", "0x1ff0", true);
        frame.frames_omitted = Some((10, 14));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["frames_omitted"][0], 10);
        assert_eq!(json["frames_omitted"][1], 14);
    }
}
