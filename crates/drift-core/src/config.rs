//! Configuration types for the drift reconciler
//!
//! This module defines all configuration structures used throughout the crate.
//! Configuration is constructed once at startup and passed by reference into
//! the resolver, provider, and notifier constructors — there is no ambient
//! global state.

use serde::{Deserialize, Serialize};

/// Default poll interval between reconciliation ticks (conservative polling)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Main drift configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Public-IP resolver configuration
    pub resolver: ResolverConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Notification channel configuration
    pub notifier: NotifierConfig,

    /// The managed DNS record
    pub record: RecordConfig,

    /// Seconds between reconciliation ticks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl DriftConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.resolver.validate()?;
        self.provider.validate()?;
        self.notifier.validate()?;
        self.record.validate()?;

        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }

        Ok(())
    }
}

/// Public-IP resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// HTTP-based resolver (queries an external echo service)
    Http {
        /// URL of a service returning a JSON body with an `ip` field
        url: String,
    },
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ResolverConfig::Http { url } => {
                if url.is_empty() {
                    return Err(crate::Error::config("HTTP resolver URL cannot be empty"));
                }
                Ok(())
            }
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare { api_token } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

/// Notification channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// Telegram bot channel
    Telegram {
        /// Bot API key
        bot_token: String,
        /// Chat to deliver messages to
        chat_id: String,
    },
}

impl NotifierConfig {
    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            NotifierConfig::Telegram { bot_token, chat_id } => {
                if bot_token.is_empty() {
                    return Err(crate::Error::config("Telegram bot token cannot be empty"));
                }
                if chat_id.is_empty() {
                    return Err(crate::Error::config("Telegram chat ID cannot be empty"));
                }
                Ok(())
            }
        }
    }
}

/// The managed DNS record
///
/// Identifies exactly one record; the process reconciles this record and no
/// other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Provider zone identifier
    pub zone_id: String,

    /// Provider record identifier
    pub record_id: String,

    /// The record's DNS name (e.g., "home.example.com")
    pub name: String,
}

impl RecordConfig {
    /// Create a new record configuration
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

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.is_empty() {
            return Err(crate::Error::config("Zone ID cannot be empty"));
        }
        if self.record_id.is_empty() {
            return Err(crate::Error::config("Record ID cannot be empty"));
        }
        if self.name.is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        Ok(())
    }
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
