// # HTTP IP Resolver
//
// This crate provides an HTTP-based public IP resolver for the drift
// reconciler.
//
// ## Architecture
//
// Issues one GET per resolution to an external echo service (e.g.
// api.ipify.org) that answers with a JSON body carrying an `ip` field, and
// returns that field verbatim. The reconciler compares the value
// byte-for-byte with the published record content, so no trimming or
// normalization happens here.
//
// A failed resolution is not retried within the call; retry belongs to the
// reconciler's next tick.

use async_trait::async_trait;
use drift_core::traits::IpResolver;
use drift_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default echo service (answers `{"ip": "198.51.100.7"}`)
pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org/?format=json";

/// HTTP timeout for echo-service requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Echo-service response body
#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

/// HTTP-based public IP resolver
#[derive(Debug)]
pub struct HttpIpResolver {
    /// URL of the echo service
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new resolver against the given echo-service URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IP_ECHO_URL)
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::resolution(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::resolution(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: EchoResponse = response
            .json()
            .await
            .map_err(|e| Error::resolution(format!("failed to parse response: {e}")))?;

        tracing::debug!("echo service reported {}", body.ip);
        Ok(body.ip)
    }
}
