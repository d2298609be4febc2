//! Error types for warranty checks.

use std::time::Duration;

use thiserror::Error;
use warranty_core::{CoreError, Verdict};

/// Errors that can abort a warranty check.
///
/// None of these are retried. Each one ends the check with an UNKNOWN
/// verdict carrying the error text.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Rejected configuration (thresholds, missing target).
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Service tag lookup for a hostname failed.
    #[error("Service tag lookup failed for {host}: {message}")]
    Lookup {
        /// Host that was queried.
        host: String,
        /// Error message.
        message: String,
    },

    /// The entitlement fetch did not finish in time.
    #[error("Entitlement fetch timed out after {}s", .timeout.as_secs_f64())]
    FetchTimeout {
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The entitlement source failed or returned an unusable document.
    #[error("Entitlement fetch failed: {message}")]
    Fetch {
        /// Error message.
        message: String,
    },

    /// A record carried an unparsable date.
    #[error("Malformed entitlement record: {0}")]
    MalformedRecord(#[source] CoreError),

    /// Classification rejected its inputs.
    #[error("Classification error: {0}")]
    Classification(#[source] CoreError),
}

impl ProbeError {
    /// Whether this is the fetch timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::FetchTimeout { .. })
    }

    /// Whether the check was rejected before contacting anything.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Classification(_))
    }

    /// The UNKNOWN verdict reported for this error.
    #[must_use]
    pub fn to_verdict(&self) -> Verdict {
        Verdict::unknown(self.to_string())
    }
}

impl From<CoreError> for ProbeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ParseError { .. } => Self::MalformedRecord(err),
            CoreError::InvalidThresholds { .. } => Self::Classification(err),
        }
    }
}
