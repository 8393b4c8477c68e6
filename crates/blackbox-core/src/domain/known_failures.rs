//! Known-failure classification
//!
//! Some engine failures are understood, unactionable, and already mitigated
//! by the host application. Reporting them would only add noise, so they are
//! classified before any report is assembled and the process is shut down
//! gracefully instead.
//!
//! Classification runs on the **raw** low-level failure string (the engine's
//! unformatted message), not the fully formatted one, so known failures are
//! matched before any expensive formatting occurs.

/// Outcome of classifying a raw failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matches a known failure; attempt graceful shutdown, no report.
    Handled,
    /// A genuine crash; proceed to full report assembly.
    Unhandled,
}

/// Ordered set of substrings identifying known, non-fatal failure messages.
///
/// Populated once at startup via `configure()` and read-only thereafter.
/// Matching is ordered substring containment; the first match wins and the
/// order is insertion order, with no priority beyond that.
#[derive(Debug, Clone, Default)]
pub struct KnownFailureSet {
    patterns: Vec<String>,
}

impl KnownFailureSet {
    /// Create an empty set. An empty set classifies everything `Unhandled`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an ordered list of substrings.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a raw failure message against the set.
    pub fn classify(&self, raw_message: &str) -> Classification {
        for pattern in &self.patterns {
            if raw_message.contains(pattern.as_str()) {
                return Classification::Handled;
            }
        }
        Classification::Unhandled
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
