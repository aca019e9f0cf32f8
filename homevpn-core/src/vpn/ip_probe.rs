//! External IP discovery via HTTP/HTTPS
//!
//! Asks a "what is my IP" endpoint for the address the outside world sees.
//! A single attempt per call; any failure simply yields an empty address.

use crate::error::ProbeError;
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Maximum time to establish the TCP/TLS connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum time for the whole request, body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the externally visible IP address
#[derive(Debug, Clone)]
pub struct IpProbe {
    client: Client,
}

impl IpProbe {
    /// Create a probe with the default 5s connect / 10s total timeouts
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(connect_timeout: Duration, timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .use_rustls_tls()
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the trimmed response body
    ///
    /// Returns an empty string for an empty URL, a network error, a
    /// non-success status, or an unreadable body.
    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn fetch_external_ip(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        let start = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    "connection refused or unreachable".to_string()
                } else {
                    e.to_string()
                };
                warn!(
                    error = %reason,
                    duration_ms = start.elapsed().as_millis(),
                    "External IP probe failed"
                );
                return String::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "External IP probe returned error status");
            return String::new();
        }

        match response.text().await {
            Ok(body) => {
                let ip = body.trim().to_string();
                debug!(
                    ip = %ip,
                    duration_ms = start.elapsed().as_millis(),
                    "External IP probe succeeded"
                );
                ip
            }
            Err(e) => {
                warn!(error = %e, "Failed to read external IP response body");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_builds_with_defaults() {
        assert!(IpProbe::new().is_ok());
    }

    #[tokio::test]
    async fn test_empty_url_yields_empty_ip() {
        let probe = IpProbe::new().unwrap();
        assert_eq!(probe.fetch_external_ip("").await, "");
    }

    #[tokio::test]
    async fn test_malformed_url_yields_empty_ip() {
        let probe = IpProbe::new().unwrap();
        assert_eq!(probe.fetch_external_ip("not a url").await, "");
    }
}
