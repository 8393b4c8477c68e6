//! Human-readable rendering of resource counters
//!
//! Report values are fully rendered strings; these helpers turn raw byte
//! and ratio counters into the compact forms used in annotations.

/// Suffix table for [`pretty_bytes`], one step per power of 1024.
const SUFFIXES: [&str; 7] = ["b", "kb", "mb", "gb", "tb", "pb", "eb"];

/// Render a byte count with a binary-magnitude suffix.
///
/// Integral values render without a decimal part, fractional values with
/// exactly one decimal digit: `0` → `"0b"`, `1024` → `"1kb"`,
/// `1536` → `"1.5kb"`, `1048576` → `"1mb"`.
pub fn pretty_bytes(bytes: u64) -> String {
    let mut count = bytes as f64;
    let mut suffix = 0;
    while count >= 1024.0 && suffix < SUFFIXES.len() - 1 {
        suffix += 1;
        count /= 1024.0;
    }

    if count.fract() == 0.0 {
        format!("{}{}", count as u64, SUFFIXES[suffix])
    } else {
        format!("{:.1}{}", count, SUFFIXES[suffix])
    }
}

/// Render `part` as a percentage of `whole` with one decimal digit.
///
/// Returns `"unavailable"` when `whole` is zero, so callers never divide
/// by a missing counter.
pub fn percent_of(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "unavailable".to_string();
    }
    format!("{:.1}%", (part as f64 / whole as f64) * 100.0)
}
