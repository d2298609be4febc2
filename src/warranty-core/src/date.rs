//! Calendar bounds for entitlement records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// An absolute instant bounding a coverage period.
///
/// Accepted text forms, tried in order:
/// - RFC 3339 (`2024-03-10T05:59:59.000001Z`, `2024-03-10T00:00:00-06:00`)
/// - naive date-time, taken as UTC (`2024-03-10T05:59:59`, `2024-03-10 05:59:59`)
/// - bare date at midnight UTC (`2024-03-10`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateBound(DateTime<Utc>);

impl DateBound {
    /// Wrap an existing UTC timestamp.
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parse a vendor date string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ParseError`] if no supported format matches.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(CoreError::ParseError {
                input: input.to_string(),
                reason: "empty date".into(),
            });
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
                return Ok(Self(Utc.from_utc_datetime(&naive)));
            }
        }

        match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => Ok(Self(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))),
            Err(e) => Err(CoreError::ParseError {
                input: input.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// The wrapped timestamp.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Signed whole days from `now` until this bound.
    ///
    /// Fractional days are rounded half away from zero, so 29.5 days
    /// left is 30 and -0.4 is 0.
    #[must_use]
    pub fn days_from(&self, now: DateTime<Utc>) -> i64 {
        let delta = self.0.signed_duration_since(now);
        // num_milliseconds only overflows for spans of ~292 million years
        let secs = delta.num_milliseconds() as f64 / 1000.0;
        (secs / SECONDS_PER_DAY).round() as i64
    }
}

impl From<DateTime<Utc>> for DateBound {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl FromStr for DateBound {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%m/%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_rfc3339() {
        let d = DateBound::parse("2024-03-10T05:59:59.000001Z").unwrap();
        assert_eq!(d.to_string(), "2024/03/10");
    }

    #[test]
    fn test_parse_offset_normalizes_to_utc() {
        let d = DateBound::parse("2024-03-10T20:00:00-06:00").unwrap();
        assert_eq!(d.to_string(), "2024/03/11");
    }

    #[test]
    fn test_parse_naive_forms() {
        let a = DateBound::parse("2024-03-10T05:59:59").unwrap();
        let b = DateBound::parse("2024-03-10 05:59:59").unwrap();
        assert_eq!(a, b);

        let c = DateBound::parse("2024-03-10").unwrap();
        assert!(c < a);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            DateBound::parse("next tuesday"),
            Err(CoreError::ParseError { .. })
        ));
        assert!(DateBound::parse("   ").is_err());
        assert!(DateBound::parse("2024-13-40").is_err());
    }

    #[test]
    fn test_days_from_rounds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let exact = DateBound::new(now + Duration::days(30));
        assert_eq!(exact.days_from(now), 30);

        let half_up = DateBound::new(now + Duration::hours(30 * 24 - 12));
        assert_eq!(half_up.days_from(now), 30);

        let under_half = DateBound::new(now + Duration::hours(30 * 24 - 13));
        assert_eq!(under_half.days_from(now), 29);

        let past = DateBound::new(now - Duration::hours(36));
        assert_eq!(past.days_from(now), -2);

        let just_past = DateBound::new(now - Duration::hours(5));
        assert_eq!(just_past.days_from(now), 0);
    }
}
