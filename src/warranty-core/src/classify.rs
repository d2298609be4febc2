//! Support-status classification.
//!
//! Turns resolved [`CoverageWindow`]s into a [`Verdict`]:
//!
//! - **Aggregate mode**: overall severity is the worst severity of any
//!   service level.
//! - **Distant mode**: only the service level with the latest end date
//!   decides the overall severity. When several share that end date the
//!   first one added to the ledger is chosen.
//!
//! In both modes every service level is still classified and reported in
//! [`Verdict::categories`], sorted by ascending end date.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::DateBound;
use crate::error::CoreError;
use crate::ledger::{CategoryKey, CoverageWindow};
use crate::threshold::ThresholdConfig;

/// Plugin severity, ordered by escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Coverage comfortably in place.
    Ok,
    /// Coverage ends within the warning window.
    Warning,
    /// Coverage ends within the critical window or has lapsed.
    Critical,
    /// The check could not be completed.
    Unknown,
}

impl Severity {
    /// Monitoring-plugin exit status.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Upper-case name used in plugin output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one service level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatus {
    /// Consolidation key.
    pub key: CategoryKey,
    /// Display label (description, code, or generic).
    pub label: String,
    /// Resolved end of coverage.
    pub end: DateBound,
    /// Rounded days from now until `end`; negative once lapsed.
    pub days_left: i64,
    /// Severity for this service level alone.
    pub severity: Severity,
}

/// The service level selected in distant mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistantStatus {
    /// Consolidation key.
    pub key: CategoryKey,
    /// Display label.
    pub label: String,
    /// Rounded days left.
    pub days_left: i64,
    /// Severity of this service level, which is the overall severity.
    pub severity: Severity,
}

/// Outcome of a warranty check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Overall plugin severity.
    pub overall_severity: Severity,
    /// Number of distinct service levels classified.
    pub category_count: usize,
    /// Service levels at WARNING or CRITICAL.
    pub expiring_count: usize,
    /// Smallest non-negative `days_left`; `None` when every service level
    /// has lapsed or none exist.
    pub next_expiry_days: Option<i64>,
    /// Every service level, ascending by end date.
    pub categories: Vec<CategoryStatus>,
    /// Whether distant mode produced this verdict.
    pub distant_only: bool,
    /// Latest-ending service level (distant mode with at least one level).
    pub distant: Option<DistantStatus>,
    /// Reason text for UNKNOWN verdicts.
    pub message: Option<String>,
}

impl Verdict {
    /// An UNKNOWN verdict with no classified service levels.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            overall_severity: Severity::Unknown,
            category_count: 0,
            expiring_count: 0,
            next_expiry_days: None,
            categories: Vec::new(),
            distant_only: false,
            distant: None,
            message: Some(message.into()),
        }
    }

    /// Process exit status for this verdict.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.overall_severity.exit_code()
    }
}

/// Classifies coverage windows against day thresholds.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    thresholds: ThresholdConfig,
    distant_only: bool,
}

impl StatusClassifier {
    /// Create a classifier.
    #[must_use]
    pub fn new(thresholds: ThresholdConfig, distant_only: bool) -> Self {
        Self {
            thresholds,
            distant_only,
        }
    }

    /// Classify `windows` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThresholds`] if the thresholds are
    /// invalid. No partial verdict is produced.
    pub fn classify(
        &self,
        windows: &[CoverageWindow],
        now: DateTime<Utc>,
    ) -> Result<Verdict, CoreError> {
        self.thresholds.validate()?;

        let mut categories: Vec<CategoryStatus> = windows
            .iter()
            .map(|w| {
                let days_left = w.end.days_from(now);
                CategoryStatus {
                    key: w.key.clone(),
                    label: w.label().to_string(),
                    end: w.end,
                    days_left,
                    severity: self.thresholds.severity_for(days_left),
                }
            })
            .collect();
        // Stable: equal end dates keep ledger insertion order.
        categories.sort_by_key(|c| c.end);

        let expiring_count = categories
            .iter()
            .filter(|c| c.severity != Severity::Ok)
            .count();
        let next_expiry_days = categories
            .iter()
            .map(|c| c.days_left)
            .filter(|d| *d >= 0)
            .min();

        let distant = if self.distant_only {
            categories
                .iter()
                .fold(None::<&CategoryStatus>, |best, c| match best {
                    Some(b) if c.end <= b.end => Some(b),
                    _ => Some(c),
                })
                .map(|c| DistantStatus {
                    key: c.key.clone(),
                    label: c.label.clone(),
                    days_left: c.days_left,
                    severity: c.severity,
                })
        } else {
            None
        };

        let overall_severity = match &distant {
            Some(d) => d.severity,
            None => categories
                .iter()
                .map(|c| c.severity)
                .max()
                .unwrap_or(Severity::Ok),
        };

        debug!(
            overall = %overall_severity,
            categories = categories.len(),
            expiring = expiring_count,
            next = ?next_expiry_days,
            distant_only = self.distant_only,
            "Classification complete"
        );

        Ok(Verdict {
            overall_severity,
            category_count: categories.len(),
            expiring_count,
            next_expiry_days,
            categories,
            distant_only: self.distant_only,
            distant,
            message: None,
        })
    }
}
