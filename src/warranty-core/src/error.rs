//! Error types for the consolidation engine.

use thiserror::Error;

/// Errors raised while building or classifying coverage data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A date field could not be parsed.
    #[error("Unparsable date '{input}': {reason}")]
    ParseError {
        /// The offending input text.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Thresholds are negative or critical exceeds warning.
    #[error("Invalid thresholds: warning={warn_days} critical={crit_days} (need 0 <= critical <= warning)")]
    InvalidThresholds {
        /// Warning threshold in days.
        warn_days: i64,
        /// Critical threshold in days.
        crit_days: i64,
    },
}
