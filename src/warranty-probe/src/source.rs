//! Entitlement sources.
//!
//! A source turns a service tag into raw [`EntitlementRecord`]s. The
//! check bounds every fetch with its own timeout, so sources only need
//! to fail on their own errors.
//!
//! ## Document format
//!
//! Both the HTTPS API and entitlement files use the same JSON shape:
//!
//! ```json
//! [{
//!   "serviceTag": "ABC1234",
//!   "invalid": false,
//!   "entitlements": [{
//!     "serviceLevelCode": "ND",
//!     "serviceLevelDescription": "Next Business Day Onsite",
//!     "serviceProvider": "DELL",
//!     "entitlementType": "INITIAL",
//!     "startDate": "2021-03-09T06:00:00Z",
//!     "endDate": "2024-03-10T05:59:59.000001Z"
//!   }]
//! }]
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use warranty_core::EntitlementRecord;

use crate::error::ProbeError;

/// Something that can fetch entitlement records for a service tag.
#[async_trait]
pub trait EntitlementSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch all entitlement records for `asset_id`.
    async fn fetch(&self, asset_id: &str) -> Result<Vec<EntitlementRecord>, ProbeError>;
}

/// One asset in an entitlement document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntitlements {
    /// Service tag the entry describes.
    #[serde(default)]
    pub service_tag: Option<String>,
    /// Set by the vendor for unknown tags.
    #[serde(default)]
    pub invalid: bool,
    /// Entitlement line items.
    #[serde(default)]
    pub entitlements: Vec<EntitlementPayload>,
}

/// One entitlement line item on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementPayload {
    /// Service level code.
    #[serde(default)]
    pub service_level_code: Option<String>,
    /// Service level description.
    #[serde(default)]
    pub service_level_description: Option<String>,
    /// Service provider.
    #[serde(default)]
    pub service_provider: Option<String>,
    /// Entitlement kind tag.
    #[serde(default)]
    pub entitlement_type: String,
    /// Coverage start.
    pub start_date: String,
    /// Coverage end.
    pub end_date: String,
}

impl TryFrom<EntitlementPayload> for EntitlementRecord {
    type Error = ProbeError;

    fn try_from(p: EntitlementPayload) -> Result<Self, Self::Error> {
        let mut record = EntitlementRecord::parse(p.entitlement_type, &p.start_date, &p.end_date)?;
        record.category_code = p.service_level_code;
        record.description = p.service_level_description;
        record.provider = p.service_provider;
        Ok(record)
    }
}

/// Pick the asset matching `asset_id` and convert its line items.
///
/// A single-asset document is accepted even without a matching
/// `serviceTag`. Any malformed date fails the whole document.
pub fn records_for(
    assets: Vec<AssetEntitlements>,
    asset_id: &str,
) -> Result<Vec<EntitlementRecord>, ProbeError> {
    let single = assets.len() == 1;
    let asset = assets
        .into_iter()
        .find(|a| {
            single
                || a.service_tag
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(asset_id))
        })
        .ok_or_else(|| ProbeError::Fetch {
            message: format!("no entitlement data for {asset_id}"),
        })?;

    if asset.invalid {
        return Err(ProbeError::Fetch {
            message: format!("service tag {asset_id} is not recognised by the vendor"),
        });
    }

    let records = asset
        .entitlements
        .into_iter()
        .map(EntitlementRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(asset = %asset_id, records = records.len(), "Entitlement records decoded");
    Ok(records)
}

/// Parse an entitlement document.
///
/// # Errors
///
/// Returns [`ProbeError::Fetch`] for invalid JSON and
/// [`ProbeError::MalformedRecord`] for bad dates.
pub fn parse_document(raw: &str, asset_id: &str) -> Result<Vec<EntitlementRecord>, ProbeError> {
    let assets: Vec<AssetEntitlements> =
        serde_json::from_str(raw).map_err(|e| ProbeError::Fetch {
            message: format!("invalid entitlement document: {e}"),
        })?;
    records_for(assets, asset_id)
}

/// Reads entitlements from a local JSON document.
#[derive(Debug, Clone)]
pub struct FileEntitlementSource {
    path: PathBuf,
}

impl FileEntitlementSource {
    /// Create a source backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EntitlementSource for FileEntitlementSource {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, asset_id: &str) -> Result<Vec<EntitlementRecord>, ProbeError> {
        debug!(path = %self.path.display(), "Reading entitlement file");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProbeError::Fetch {
                message: format!("cannot read {}: {e}", self.path.display()),
            })?;
        parse_document(&raw, asset_id)
    }
}
