//! Answers "is the network reachable?" before a turn is dispatched.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::utils::url::host_and_port;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Treats the network as reachable when the provider host resolves.
pub struct DnsProbe {
    host: String,
}

impl DnsProbe {
    /// Builds a probe for the host part of `base_url`, port 443 unless given.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            host: host_and_port(base_url),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for DnsProbe {
    async fn is_online(&self) -> bool {
        match tokio::time::timeout(PROBE_TIMEOUT, tokio::net::lookup_host(self.host.as_str())).await
        {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(err)) => {
                debug!(host = %self.host, error = %err, "connectivity probe failed");
                false
            }
            Err(_) => {
                debug!(host = %self.host, "connectivity probe timed out");
                false
            }
        }
    }
}

/// Fixed answer, used by `--offline` and by tests.
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}
