//! # warranty-core
//!
//! Entitlement consolidation and support-status classification for
//! hardware warranty checks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  EntitlementRecord   │  raw line items from the vendor API
//! └──────────┬───────────┘
//!            │ add()
//!            ▼
//! ┌──────────────────────┐
//! │    CoverageLedger    │  one CoverageWindow per service level,
//! │  (max end date wins) │  expired records excluded
//! └──────────┬───────────┘
//!            │ windows()
//!            ▼
//! ┌──────────────────────┐
//! │   StatusClassifier   │  days left vs. warn/crit thresholds,
//! │                      │  aggregate or distant-only verdict
//! └──────────┬───────────┘
//!            │ Verdict
//!            ▼
//! ┌──────────────────────┐
//! │   VerdictFormatter   │  summary line + per-category detail
//! └──────────────────────┘
//! ```
//!
//! Nothing in this crate performs I/O. Fetching records and resolving
//! service tags lives in `warranty-probe`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod classify;
pub mod date;
pub mod error;
pub mod format;
pub mod ledger;
pub mod record;
pub mod threshold;

pub use classify::{CategoryStatus, DistantStatus, Severity, StatusClassifier, Verdict};
pub use date::DateBound;
pub use error::CoreError;
pub use format::VerdictFormatter;
pub use ledger::{CategoryKey, CoverageLedger, CoverageWindow};
pub use record::{EntitlementRecord, EXPIRED_KIND};
pub use threshold::ThresholdConfig;
