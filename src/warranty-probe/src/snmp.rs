//! Service tag lookup over SNMP.
//!
//! Dell servers running OpenManage expose the chassis service tag at
//! [`SERVICE_TAG_OID`](crate::config::SERVICE_TAG_OID). The `snmp` crate
//! is blocking, so each lookup runs on the blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use snmp::{SyncSession, Value};
use tracing::{debug, instrument};

use crate::error::ProbeError;

/// Resolves a hostname to a service tag.
#[async_trait]
pub trait ServiceTagResolver: Send + Sync {
    /// Look up the service tag for `host`.
    async fn resolve(&self, host: &str) -> Result<String, ProbeError>;
}

/// SNMP v2c resolver.
#[derive(Debug, Clone)]
pub struct SnmpResolver {
    community: String,
    port: u16,
    oid: Vec<u32>,
    timeout: Duration,
}

impl SnmpResolver {
    /// Create a resolver.
    pub fn new(community: impl Into<String>, port: u16, oid: Vec<u32>, timeout: Duration) -> Self {
        Self {
            community: community.into(),
            port,
            oid,
            timeout,
        }
    }

    fn get_blocking(&self, host: &str) -> Result<String, String> {
        let mut session = SyncSession::new(
            (host, self.port),
            self.community.as_bytes(),
            Some(self.timeout),
            0,
        )
        .map_err(|e| format!("cannot open SNMP session: {e}"))?;

        let mut response = session
            .get(&self.oid)
            .map_err(|e| format!("SNMP get failed: {e:?}"))?;

        if response.error_status != 0 {
            return Err(format!("agent returned error status {}", response.error_status));
        }

        match response.varbinds.next() {
            Some((_, Value::OctetString(raw))) => {
                service_tag_from(raw).ok_or_else(|| "empty service tag".to_string())
            },
            Some(_) => Err("service tag is not an octet string".to_string()),
            None => Err("no value returned".to_string()),
        }
    }
}

#[async_trait]
impl ServiceTagResolver for SnmpResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, host: &str) -> Result<String, ProbeError> {
        let resolver = self.clone();
        let target = host.to_string();
        let joined = tokio::task::spawn_blocking(move || resolver.get_blocking(&target)).await;

        let tag = match joined {
            Ok(result) => result,
            Err(e) => Err(format!("lookup task failed: {e}")),
        }
        .map_err(|message| ProbeError::Lookup {
            host: host.to_string(),
            message,
        })?;

        debug!(host = %host, service_tag = %tag, "Service tag resolved");
        Ok(tag)
    }
}

/// First whitespace-separated token of an SNMP octet string.
pub fn service_tag_from(raw: &[u8]) -> Option<String> {
    String::from_utf8_lossy(raw)
        .split_whitespace()
        .next()
        .map(str::to_string)
}
