//! Warranty check orchestration.
//!
//! A check runs these steps, stopping at the first failure:
//! 1. Threshold validation (before anything touches the network)
//! 2. Service tag resolution (explicit tag, or SNMP lookup by hostname)
//! 3. Entitlement fetch, bounded by the configured timeout
//! 4. Consolidation into a [`CoverageLedger`]
//! 5. Classification
//!
//! Failures are folded into an UNKNOWN [`Verdict`] by [`WarrantyProbe::run`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use warranty_core::{CoverageLedger, StatusClassifier, Verdict};

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::https::HttpsEntitlementSource;
use crate::snmp::{ServiceTagResolver, SnmpResolver};
use crate::source::EntitlementSource;

/// What to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetTarget {
    /// A known service tag.
    ServiceTag(String),
    /// A host whose service tag must be looked up.
    Hostname(String),
}

impl AssetTarget {
    /// Pick a target from command-line options.
    ///
    /// An explicit service tag wins over a hostname. Empty strings count
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] if neither is given.
    pub fn from_options(
        service_tag: Option<String>,
        hostname: Option<String>,
    ) -> Result<Self, ProbeError> {
        let present = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        match (present(service_tag), present(hostname)) {
            (Some(tag), _) => Ok(Self::ServiceTag(tag)),
            (None, Some(host)) => Ok(Self::Hostname(host)),
            (None, None) => Err(ProbeError::Config {
                message: "Must supply either a hostname or a service tag".into(),
            }),
        }
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Resolved service tag, if resolution got that far.
    pub asset_id: Option<String>,
    /// Final verdict.
    pub verdict: Verdict,
}

/// Runs warranty checks against an entitlement source.
pub struct WarrantyProbe {
    /// Configuration.
    config: ProbeConfig,
    /// Where entitlement records come from.
    source: Box<dyn EntitlementSource>,
    /// Hostname to service tag lookup.
    resolver: Box<dyn ServiceTagResolver>,
}

impl WarrantyProbe {
    /// Create a probe with explicit collaborators.
    pub fn new(
        config: ProbeConfig,
        source: Box<dyn EntitlementSource>,
        resolver: Box<dyn ServiceTagResolver>,
    ) -> Self {
        Self {
            config,
            source,
            resolver,
        }
    }

    /// Create a probe using the HTTPS API and SNMP lookups.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: ProbeConfig) -> Result<Self, ProbeError> {
        let source = HttpsEntitlementSource::new(
            &config.endpoint,
            config.timeout,
            config.api_key.clone(),
        )?;
        let resolver = Self::snmp_resolver(&config);
        Ok(Self::new(config, Box::new(source), Box::new(resolver)))
    }

    /// SNMP resolver built from `config`.
    pub fn snmp_resolver(config: &ProbeConfig) -> SnmpResolver {
        SnmpResolver::new(
            config.snmp_community.clone(),
            config.snmp_port,
            config.service_tag_oid.clone(),
            config.timeout,
        )
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Turn a target into a service tag.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Lookup`] if the SNMP lookup fails or exceeds
    /// the timeout.
    pub async fn resolve(&self, target: &AssetTarget) -> Result<String, ProbeError> {
        match target {
            AssetTarget::ServiceTag(tag) => Ok(tag.clone()),
            AssetTarget::Hostname(host) => {
                info!(host = %host, "Looking up service tag");
                tokio::time::timeout(self.config.timeout, self.resolver.resolve(host))
                    .await
                    .map_err(|_| ProbeError::Lookup {
                        host: host.clone(),
                        message: format!("timed out after {:?}", self.config.timeout),
                    })?
            },
        }
    }

    /// Fetch, consolidate and classify entitlements for `asset_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] for invalid thresholds (checked
    /// before fetching), [`ProbeError::FetchTimeout`] if the
    /// source exceeds the timeout, and any error the source reports.
    #[instrument(skip(self, now), fields(source = %self.source.name()))]
    pub async fn check(&self, asset_id: &str, now: DateTime<Utc>) -> Result<Verdict, ProbeError> {
        self.validate_thresholds()?;

        let timeout = self.config.timeout;
        let records = match tokio::time::timeout(timeout, self.source.fetch(asset_id)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Entitlement fetch timed out after {:?}", timeout);
                return Err(ProbeError::FetchTimeout { timeout });
            },
        };

        let ledger: CoverageLedger = records.into_iter().collect();
        debug!(
            records = ledger.entitlements().len(),
            service_levels = ledger.len(),
            "Entitlements consolidated"
        );

        let verdict = StatusClassifier::new(self.config.thresholds, self.config.distant_only)
            .classify(ledger.windows(), now)?;
        Ok(verdict)
    }

    /// Run a complete check, folding any failure into UNKNOWN.
    pub async fn run(&self, target: &AssetTarget, now: DateTime<Utc>) -> CheckReport {
        if let Err(e) = self.validate_thresholds() {
            return Self::failed(None, &e);
        }

        let asset_id = match self.resolve(target).await {
            Ok(id) => id,
            Err(e) => return Self::failed(None, &e),
        };
        info!(asset_id = %asset_id, "Checking entitlements");

        match self.check(&asset_id, now).await {
            Ok(verdict) => CheckReport {
                asset_id: Some(asset_id),
                verdict,
            },
            Err(e) => Self::failed(Some(asset_id), &e),
        }
    }

    fn validate_thresholds(&self) -> Result<(), ProbeError> {
        self.config
            .thresholds
            .validate()
            .map_err(|e| ProbeError::Config {
                message: e.to_string(),
            })
    }

    fn failed(asset_id: Option<String>, err: &ProbeError) -> CheckReport {
        warn!(error = %err, "Check failed");
        CheckReport {
            asset_id,
            verdict: err.to_verdict(),
        }
    }
}
