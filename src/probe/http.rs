//! HTTP health probing

use crate::error::{ProbeError, Result};
use crate::url::build_url;
use std::future::Future;
use std::time::Duration;

/// Well-known health-check paths, tried in this order.
///
/// The bare root comes last: any listener answering there still proves the
/// host is alive, even with no health route mounted.
pub const HEALTH_PATHS: [&str; 9] = [
    "/health",
    "/status",
    "/ping",
    "/api/health",
    "/api/status",
    "/api/ping",
    "/auth/status",
    "/auth/health",
    "",
];

/// A single liveness check against one (probe root, health path) pair.
pub trait HealthProbe: Send + Sync {
    /// Check `{probe_root}{path}` for liveness.
    fn check(
        &self,
        probe_root: &str,
        path: &str,
    ) -> impl Future<Output = std::result::Result<(), ProbeError>> + Send;
}

/// reqwest-backed prober.
///
/// Liveness is deliberately permissive: any response with status below 500
/// counts as live. A 404 still proves the host is listening; only a server
/// error or no response at all is treated as dead. Tightening this would
/// reject backends whose health routes moved.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpProber {
    /// Build a prober with the given per-probe timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

impl HealthProbe for HttpProber {
    fn check(
        &self,
        probe_root: &str,
        path: &str,
    ) -> impl Future<Output = std::result::Result<(), ProbeError>> + Send {
        let url = build_url(probe_root, path);
        let client = self.client.clone();
        let timeout_ms = self.timeout_ms;

        async move {
            let url = url.map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
            match client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status < 500 {
                        Ok(())
                    } else {
                        Err(ProbeError::ServerStatus(status))
                    }
                }
                Err(e) if e.is_timeout() => Err(ProbeError::Timeout(timeout_ms)),
                Err(e) => Err(ProbeError::Network(e.to_string())),
            }
        }
    }
}
