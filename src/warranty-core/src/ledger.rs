//! Service-level consolidation.
//!
//! The vendor returns one record per contract line, and the same service
//! level routinely appears several times (original purchase, renewals,
//! parts-only extensions). [`CoverageLedger`] folds those records into one
//! [`CoverageWindow`] per service level, keeping the latest end date.
//!
//! ## Merge rules
//!
//! 1. Records tagged [`EXPIRED_KIND`](crate::record::EXPIRED_KIND) are kept
//!    in the history but never touch a window.
//! 2. Records with a service level code merge under that code.
//! 3. Records without a code each get a fresh synthetic key, so two
//!    anonymous records never merge.
//! 4. On merge the end date is the max of the two; description and code
//!    stay as first seen.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::date::DateBound;
use crate::record::EntitlementRecord;

/// Key a coverage window is consolidated under.
///
/// Vendor codes and synthetic keys live in separate variants and
/// cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    /// Vendor-provided service level code.
    Code(String),
    /// Per-ledger sequence number for a record without a code.
    Synthetic(u64),
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => f.write_str(code),
            Self::Synthetic(n) => write!(f, "#{n}"),
        }
    }
}

/// Resolved coverage for one service level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageWindow {
    /// Consolidation key.
    pub key: CategoryKey,
    /// Vendor code from the first record seen, if any.
    pub category_code: Option<String>,
    /// Description from the first record seen, if any.
    pub description: Option<String>,
    /// Latest end date across all merged records.
    pub end: DateBound,
}

impl CoverageWindow {
    fn from_record(key: CategoryKey, record: &EntitlementRecord) -> Self {
        Self {
            key,
            category_code: record.category_code.clone(),
            description: record.description.clone(),
            end: record.end,
        }
    }

    fn extend_to(&mut self, end: DateBound) {
        if end > self.end {
            self.end = end;
        }
    }

    /// Label for display: description, then code, then a generic name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.category_code.as_deref().filter(|c| !c.is_empty()))
            .unwrap_or("Unnamed service level")
    }
}

/// Accumulates entitlement records into per-service-level windows.
///
/// Owned by a single check and dropped after classification.
#[derive(Debug, Default)]
pub struct CoverageLedger {
    /// Every record added, expired ones included.
    entitlements: Vec<EntitlementRecord>,
    /// Windows in first-insertion order.
    windows: Vec<CoverageWindow>,
    /// Key to position in `windows`.
    index: HashMap<CategoryKey, usize>,
    /// Next synthetic key to hand out.
    next_synthetic: u64,
}

impl CoverageLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entitlement and fold it into its window.
    pub fn add(&mut self, record: EntitlementRecord) {
        if record.is_expired() {
            trace!(code = ?record.category_code, "Expired entitlement kept in history only");
            self.entitlements.push(record);
            return;
        }

        let key = match &record.category_code {
            Some(code) => CategoryKey::Code(code.clone()),
            None => {
                let n = self.next_synthetic;
                self.next_synthetic += 1;
                CategoryKey::Synthetic(n)
            },
        };

        match self.index.get(&key).copied() {
            Some(pos) => {
                let window = &mut self.windows[pos];
                debug!(key = %key, current = %window.end, incoming = %record.end, "Merging entitlement");
                window.extend_to(record.end);
            },
            None => {
                debug!(key = %key, end = %record.end, "New service level");
                self.index.insert(key.clone(), self.windows.len());
                self.windows.push(CoverageWindow::from_record(key, &record));
            },
        }

        self.entitlements.push(record);
    }

    /// Resolved windows, one per key, in first-insertion order.
    #[must_use]
    pub fn windows(&self) -> &[CoverageWindow] {
        &self.windows
    }

    /// Look up the window for a key.
    #[must_use]
    pub fn get(&self, key: &CategoryKey) -> Option<&CoverageWindow> {
        self.index.get(key).map(|&pos| &self.windows[pos])
    }

    /// Full entitlement history, including expired records.
    #[must_use]
    pub fn entitlements(&self) -> &[EntitlementRecord] {
        &self.entitlements
    }

    /// Number of distinct service levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no service level has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Extend<EntitlementRecord> for CoverageLedger {
    fn extend<I: IntoIterator<Item = EntitlementRecord>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}

impl FromIterator<EntitlementRecord> for CoverageLedger {
    fn from_iter<I: IntoIterator<Item = EntitlementRecord>>(iter: I) -> Self {
        let mut ledger = Self::new();
        ledger.extend(iter);
        ledger
    }
}
