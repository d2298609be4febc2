//! Warning and critical day thresholds.

use serde::{Deserialize, Serialize};

use crate::classify::Severity;
use crate::error::CoreError;

/// Default warning threshold in days.
pub const DEFAULT_WARN_DAYS: i64 = 90;
/// Default critical threshold in days.
pub const DEFAULT_CRIT_DAYS: i64 = 30;

/// Day thresholds for support expiry.
///
/// Invariant once constructed through [`ThresholdConfig::new`]:
/// `0 <= crit_days <= warn_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Days left at or below which a category is WARNING.
    pub warn_days: i64,
    /// Days left at or below which a category is CRITICAL.
    pub crit_days: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warn_days: DEFAULT_WARN_DAYS,
            crit_days: DEFAULT_CRIT_DAYS,
        }
    }
}

impl ThresholdConfig {
    /// Build validated thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThresholds`] if either value is
    /// negative or `crit_days > warn_days`.
    pub fn new(warn_days: i64, crit_days: i64) -> Result<Self, CoreError> {
        let config = Self {
            warn_days,
            crit_days,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold relationship.
    ///
    /// The fields are public, so the classifier re-runs this before
    /// every classification.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThresholds`] on violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.warn_days < 0 || self.crit_days < 0 || self.crit_days > self.warn_days {
            return Err(CoreError::InvalidThresholds {
                warn_days: self.warn_days,
                crit_days: self.crit_days,
            });
        }
        Ok(())
    }

    /// Severity for a category with `days_left` days of coverage.
    ///
    /// Both comparisons are inclusive: exactly `crit_days` left is
    /// CRITICAL and exactly `warn_days` left is WARNING. Releases before
    /// 0.3 compared with `<`.
    #[must_use]
    pub fn severity_for(&self, days_left: i64) -> Severity {
        if days_left <= self.crit_days {
            Severity::Critical
        } else if days_left <= self.warn_days {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}
