use serde::{Deserialize, Serialize};

/// Tunable thresholds for telling a wedge burst apart from human typing.
///
/// The defaults were picked empirically against common USB wedge scanners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WedgeConfig {
    /// Shortest value (in digits) that can be a barcode.
    pub min_digits: usize,
    /// Longest value (in digits) that can be a barcode.
    pub max_digits: usize,
    /// Recorded keystrokes needed before timing is trusted (capped at the value length).
    pub min_samples: usize,
    /// Average gap between digits at or below which the burst counts as a wedge.
    pub max_avg_interval_ms: f64,
    /// Values at least this long may instead qualify on total burst span.
    pub long_value_digits: usize,
    /// Total span across recorded keystrokes for the long-value rule.
    pub max_burst_span_ms: f64,
    /// Keystroke ring size; oldest entries are evicted first.
    pub ring_capacity: usize,
    /// The field shrinking by more than this many characters counts as a manual edit.
    pub shrink_reset_chars: usize,
}

impl Default for WedgeConfig {
    fn default() -> Self {
        Self {
            min_digits: 8,
            max_digits: 14,
            min_samples: 8,
            max_avg_interval_ms: 35.0,
            long_value_digits: 10,
            max_burst_span_ms: 400.0,
            ring_capacity: 32,
            shrink_reset_chars: 2,
        }
    }
}
