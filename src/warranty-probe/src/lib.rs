//! # warranty-probe
//!
//! Monitoring probe for hardware support contracts. Resolves a server's
//! service tag, fetches its entitlements from the vendor and reports how
//! close the support coverage is to expiring.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    WarrantyProbe                         │
//! │                                                          │
//! │  ┌──────────────────┐      ┌──────────────────────────┐ │
//! │  │ SnmpResolver     │      │ EntitlementSource        │ │
//! │  │ (host → tag)     │      │ (HTTPS API / JSON file)  │ │
//! │  └──────────────────┘      └──────────────────────────┘ │
//! │            │   bounded by ProbeConfig::timeout   │       │
//! │            ▼                                      ▼       │
//! │  ┌──────────────────────────────────────────────────┐   │
//! │  │   warranty_core: CoverageLedger → StatusClassifier│   │
//! │  └──────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure handling
//!
//! - Every failure ends the check with UNKNOWN (exit 3)
//! - A fetch that exceeds the timeout is abandoned, never retried
//! - A single malformed record fails the whole check

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod https;
pub mod probe;
pub mod snmp;
pub mod source;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use https::HttpsEntitlementSource;
pub use probe::{AssetTarget, CheckReport, WarrantyProbe};
pub use snmp::{ServiceTagResolver, SnmpResolver};
pub use source::{EntitlementSource, FileEntitlementSource};
