//! Configuration for warranty checks.

use std::time::Duration;

use warranty_core::ThresholdConfig;

/// Dell chassis service tag (`chassisServiceTagName.1`).
pub const SERVICE_TAG_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 674, 10892, 1, 300, 10, 1, 11, 1];

/// Default entitlement API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://apigtwb2c.us.dell.com/PROD/sbil/eapi/v5";

/// Default support page prefix; the service tag is appended.
pub const DEFAULT_SUPPORT_URL: &str =
    "https://www.dell.com/support/home/product-support/servicetag/";

/// Configuration for a warranty check.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Entitlement API base URL.
    pub endpoint: String,
    /// Bearer token for the entitlement API.
    pub api_key: Option<String>,
    /// Bound on the entitlement fetch and the SNMP lookup.
    pub timeout: Duration,
    /// SNMP community for service tag lookups.
    pub snmp_community: String,
    /// SNMP agent port.
    pub snmp_port: u16,
    /// OID holding the service tag.
    pub service_tag_oid: Vec<u32>,
    /// Day thresholds.
    pub thresholds: ThresholdConfig,
    /// Classify on the latest-ending service level only.
    pub distant_only: bool,
    /// Support page prefix for the HTML link.
    pub support_url: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
            timeout: Duration::from_secs(5),
            snmp_community: "public".into(),
            snmp_port: 161,
            service_tag_oid: SERVICE_TAG_OID.to_vec(),
            thresholds: ThresholdConfig::default(),
            distant_only: false,
            support_url: DEFAULT_SUPPORT_URL.into(),
        }
    }
}
