// # DNS Provider Trait
//
// Defines the interface for verifying credentials and reading/writing the
// managed DNS record via a provider API.
//
// ## Implementations
//
// - Cloudflare: `drift-provider-cloudflare` crate
// - Future: Route53, DigitalOcean, GoDaddy, etc.
//
// Providers are transports only. They make single-shot API calls and return
// the provider's diagnostic on failure. All policy — when to read, when to
// write, what to do about errors — is owned by the `Reconciler`.

use async_trait::async_trait;

/// Identifies the managed DNS record at the provider.
///
/// Constructed once from configuration and immutable for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    /// Provider zone identifier
    pub zone_id: String,
    /// Provider record identifier
    pub record_id: String,
    /// The record's DNS name (providers require it alongside the ID on write)
    pub name: String,
}

impl RecordRef {
    /// Create a new record reference
    pub fn new(
        zone_id: impl Into<String>,
        record_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_id: record_id.into(),
            name: name.into(),
        }
    }
}

/// Summary of one record as returned by a zone listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record name
    pub name: String,
    /// The record type (e.g. "A")
    pub record_type: String,
    /// The record content
    pub content: String,
}

/// Trait for DNS provider implementations
///
/// Every method requires a valid credential and fails with
/// [`Error::Provider`](crate::Error::Provider) carrying the provider's
/// diagnostic on any non-success response or transport failure.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Check whether the configured credential is currently valid/active.
    ///
    /// Called once at process startup. An inactive credential is a fatal
    /// startup condition, not a retryable tick failure — the reconciler never
    /// enters the run loop with a known-bad credential.
    async fn verify_credential(&self) -> Result<bool, crate::Error>;

    /// Return the content field of the identified record.
    async fn read_record(&self, record: &RecordRef) -> Result<String, crate::Error>;

    /// Overwrite the record's content with `new_ip`, preserving record type
    /// "A", disabling proxying, and setting a minimal TTL.
    ///
    /// Returns the provider-confirmed new content value. Callers treat a
    /// returned value differing from the requested `new_ip` as unexpected
    /// but do not re-verify it.
    async fn write_record(
        &self,
        record: &RecordRef,
        new_ip: &str,
    ) -> Result<String, crate::Error>;

    /// Enumerate all records in a zone.
    ///
    /// Part of the collaborator capability but not exercised by the
    /// reconciler's control path.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSummary>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare", "route53")
    fn provider_name(&self) -> &'static str;
}
