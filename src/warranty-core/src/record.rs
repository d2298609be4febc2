//! Raw entitlement line items.

use serde::{Deserialize, Serialize};

use crate::date::DateBound;
use crate::error::CoreError;

/// Entitlement kind tag for coverage that has already lapsed.
pub const EXPIRED_KIND: &str = "Expired";

/// A single coverage line item as delivered by the vendor.
///
/// Several records may describe the same service level (renewals,
/// extensions, parts vs. labor splits). Absent fields stay `None`; an
/// empty string is a present value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    /// Stable service level code, when the vendor provides one.
    pub category_code: Option<String>,
    /// Human-readable service level description.
    pub description: Option<String>,
    /// Organisation delivering the service.
    pub provider: Option<String>,
    /// Entitlement kind tag (e.g. `Active`, `Expired`, `EXTENDED`).
    pub kind: String,
    /// Start of coverage.
    pub start: DateBound,
    /// End of coverage.
    pub end: DateBound,
}

impl EntitlementRecord {
    /// Build a record from already-parsed bounds.
    #[must_use]
    pub fn new(kind: impl Into<String>, start: DateBound, end: DateBound) -> Self {
        Self {
            category_code: None,
            description: None,
            provider: None,
            kind: kind.into(),
            start,
            end,
        }
    }

    /// Build a record from vendor date strings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ParseError`] if either date is malformed.
    pub fn parse(kind: impl Into<String>, start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self::new(kind, DateBound::parse(start)?, DateBound::parse(end)?))
    }

    /// Set the service level code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.category_code = Some(code.into());
        self
    }

    /// Set the service level description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the service provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Whether this record is tagged as lapsed coverage.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.kind == EXPIRED_KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_record() {
        let rec = EntitlementRecord::parse("Active", "2021-01-01", "2024-01-01T00:00:00Z")
            .unwrap()
            .with_code("ND")
            .with_description("Next Business Day")
            .with_provider("DELL");

        assert_eq!(rec.category_code.as_deref(), Some("ND"));
        assert_eq!(rec.provider.as_deref(), Some("DELL"));
        assert!(rec.start < rec.end);
        assert!(!rec.is_expired());
    }

    #[test]
    fn test_parse_propagates_bad_end_date() {
        let err = EntitlementRecord::parse("Active", "2021-01-01", "soon").unwrap_err();
        assert!(matches!(err, CoreError::ParseError { ref input, .. } if input == "soon"));
    }

    #[test]
    fn test_expired_tag_is_exact() {
        let start = DateBound::parse("2020-01-01").unwrap();
        let end = DateBound::parse("2021-01-01").unwrap();
        assert!(EntitlementRecord::new("Expired", start, end).is_expired());
        assert!(!EntitlementRecord::new("EXTENDED", start, end).is_expired());
    }

    #[test]
    fn test_empty_code_is_distinct_from_absent() {
        let start = DateBound::parse("2020-01-01").unwrap();
        let end = DateBound::parse("2021-01-01").unwrap();
        let empty = EntitlementRecord::new("Active", start, end).with_code("");
        let absent = EntitlementRecord::new("Active", start, end);
        assert_eq!(empty.category_code, Some(String::new()));
        assert_eq!(absent.category_code, None);
        assert_ne!(empty, absent);
    }
}
