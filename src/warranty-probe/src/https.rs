//! HTTPS client for the vendor entitlement API.
//!
//! ## Endpoints
//!
//! - `GET /asset-entitlements?servicetags={tag}` - entitlement document for
//!   one or more service tags (see [`crate::source`] for the shape)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, info, instrument, warn};
use warranty_core::EntitlementRecord;

use crate::error::ProbeError;
use crate::source::{records_for, AssetEntitlements, EntitlementSource};

/// Entitlement source backed by the vendor HTTPS API.
pub struct HttpsEntitlementSource {
    /// HTTP client.
    client: Client,
    /// Base URL for the API.
    base_url: String,
    /// Bearer token, if the API requires one.
    api_key: Option<String>,
    /// Per-request bound, reported when the client gives up.
    timeout: Duration,
}

impl HttpsEntitlementSource {
    /// Create a new client.
    ///
    /// `timeout` bounds each request; the caller applies its own bound
    /// around the whole fetch as well.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self, ProbeError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .user_agent(format!("check_warranty/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Fetch {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout,
        })
    }

    fn request_error(&self, url: &str, context: &str, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            warn!(url = %url, "HTTPS: Request timed out after {:?}", self.timeout);
            return ProbeError::FetchTimeout {
                timeout: self.timeout,
            };
        }
        warn!(url = %url, error = %err, "HTTPS: {}", context);
        ProbeError::Fetch {
            message: format!("{} {}: {}", context, url, err),
        }
    }

    /// Fetch the raw entitlement document for `asset_id`.
    #[instrument(skip(self), fields(asset_id = %asset_id))]
    pub async fn get_asset_entitlements(
        &self,
        asset_id: &str,
    ) -> Result<Vec<AssetEntitlements>, ProbeError> {
        let url = format!("{}/asset-entitlements", self.base_url);
        info!(url = %url, "HTTPS: Fetching entitlements...");

        let mut request = self.client.get(&url).query(&[("servicetags", asset_id)]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.request_error(&url, "Request failed for", e))?;

        let status = response.status();
        debug!(url = %url, status = %status, "HTTPS: Response received");

        if !status.is_success() {
            warn!(url = %url, status = %status, "HTTPS: Non-success status");
            return Err(ProbeError::Fetch {
                message: format!("HTTP {} from {}", status, url),
            });
        }

        response
            .json::<Vec<AssetEntitlements>>()
            .await
            .map_err(|e| self.request_error(&url, "Failed to read response from", e))
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EntitlementSource for HttpsEntitlementSource {
    fn name(&self) -> &str {
        "https"
    }

    async fn fetch(&self, asset_id: &str) -> Result<Vec<EntitlementRecord>, ProbeError> {
        let assets = self.get_asset_entitlements(asset_id).await?;
        records_for(assets, asset_id)
    }
}
