// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the drift
// reconciler.
//
// Single-shot API calls only: the provider makes one HTTP request per
// operation and propagates every failure to the reconciler, which owns the
// retry-next-tick policy. No retry, no backoff, no caching, no background
// tasks.
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify Token: GET `/user/tokens/verify`
// - DNS Record Details: GET `/zones/:zone_id/dns_records/:record_id`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - List DNS Records: GET `/zones/:zone_id/dns_records`

use async_trait::async_trait;
use drift_core::traits::{DnsProvider, RecordRef, RecordSummary};
use drift_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS provider
///
/// Stateless and isolated: the zone/record coordinates arrive with each call
/// as a [`RecordRef`]; the provider holds only the credential and the HTTP
/// client.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareDns {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareDns")
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl CloudflareDns {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    ///
    /// # Panics
    ///
    /// Panics if the token is empty. Configuration validation rejects empty
    /// tokens before construction; an empty token here is a wiring bug.
    pub fn new(api_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        let api_token = api_token.into();

        if api_token.is_empty() {
            panic!("Cloudflare API token cannot be empty");
        }

        Self { api_token, client }
    }

    /// Issue an authenticated GET and parse the JSON body
    async fn get_json(&self, url: &str, context: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {e}")))?;

        Self::into_json(response, context).await
    }

    /// Check the response status and parse the JSON body
    async fn into_json(response: reqwest::Response, context: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status.as_u16(), &error_text, context));
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("Failed to parse response: {e}")))
    }
}

/// Map an HTTP status code to a provider error carrying the diagnostic
fn status_error(status: u16, body: &str, context: &str) -> Error {
    match status {
        401 | 403 => Error::provider(
            "cloudflare",
            format!(
                "{context}: authentication failed (status {status}): \
                invalid API token or insufficient permissions"
            ),
        ),
        404 => Error::provider(
            "cloudflare",
            format!("{context}: not found (status {status}): {body}"),
        ),
        429 => Error::provider(
            "cloudflare",
            format!("{context}: rate limit exceeded (status {status})"),
        ),
        500..=599 => Error::provider(
            "cloudflare",
            format!("{context}: server error (transient, status {status}): {body}"),
        ),
        _ => Error::provider(
            "cloudflare",
            format!("{context}: request failed (status {status}): {body}"),
        ),
    }
}

/// Extract the token status from a `/user/tokens/verify` response
fn parse_token_status(json: &Value) -> Result<bool> {
    let status = json["result"]["status"].as_str().ok_or_else(|| {
        Error::provider(
            "cloudflare",
            "Invalid response format: result.status is not a string",
        )
    })?;

    Ok(status == "active")
}

/// Extract the record content from a record detail or update response
fn parse_record_content(json: &Value) -> Result<String> {
    let content = json["result"]["content"].as_str().ok_or_else(|| {
        Error::provider(
            "cloudflare",
            "Invalid response format: result.content is not a string",
        )
    })?;

    Ok(content.to_string())
}

/// Extract record summaries from a zone listing response
fn parse_record_list(json: &Value) -> Result<Vec<RecordSummary>> {
    let records = json["result"].as_array().ok_or_else(|| {
        Error::provider(
            "cloudflare",
            "Invalid response format: result is not an array",
        )
    })?;

    records
        .iter()
        .map(|record| {
            let field = |key: &str| {
                record[key].as_str().map(str::to_string).ok_or_else(|| {
                    Error::provider(
                        "cloudflare",
                        format!("Invalid response format: record.{key} is not a string"),
                    )
                })
            };

            Ok(RecordSummary {
                id: field("id")?,
                name: field("name")?,
                record_type: field("type")?,
                content: field("content")?,
            })
        })
        .collect()
}

/// Build the update payload for a record write
///
/// Type is pinned to "A", proxying disabled, TTL minimal (1 = automatic).
fn write_payload(record: &RecordRef, new_ip: &str) -> Value {
    serde_json::json!({
        "content": new_ip,
        "name": record.name,
        "proxied": false,
        "type": "A",
        "comment": "Domain record",
        "ttl": 1,
    })
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    /// Check whether the token is currently active
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /user/tokens/verify
    /// Authorization: Bearer <token>
    /// ```
    async fn verify_credential(&self) -> Result<bool> {
        let url = format!("{CLOUDFLARE_API_BASE}/user/tokens/verify");
        let json = self.get_json(&url, "token verification").await?;
        let active = parse_token_status(&json)?;

        tracing::debug!(
            "token status: {}",
            if active { "active" } else { "inactive" }
        );
        Ok(active)
    }

    /// Read the record's current content
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// ```
    async fn read_record(&self, record: &RecordRef) -> Result<String> {
        let url = format!(
            "{CLOUDFLARE_API_BASE}/zones/{}/dns_records/{}",
            record.zone_id, record.record_id
        );

        let json = self.get_json(&url, "record read").await?;
        let content = parse_record_content(&json)?;

        tracing::debug!("record {} content: {}", record.name, content);
        Ok(content)
    }

    /// Overwrite the record content and return the stored value
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// {"content": "1.2.3.4", "name": "...", "proxied": false, "type": "A", "ttl": 1}
    /// ```
    async fn write_record(&self, record: &RecordRef, new_ip: &str) -> Result<String> {
        let url = format!(
            "{CLOUDFLARE_API_BASE}/zones/{}/dns_records/{}",
            record.zone_id, record.record_id
        );

        tracing::info!("updating Cloudflare record {} -> {}", record.name, new_ip);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&write_payload(record, new_ip))
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {e}")))?;

        let json = Self::into_json(response, "record update").await?;
        parse_record_content(&json)
    }

    /// Enumerate all records in a zone
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSummary>> {
        let url = format!("{CLOUDFLARE_API_BASE}/zones/{zone_id}/dns_records");
        let json = self.get_json(&url, "record list").await?;
        parse_record_list(&json)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
