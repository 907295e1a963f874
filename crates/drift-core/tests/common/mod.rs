//! Test doubles and common utilities for reconciler contract tests
//!
//! This module provides counting mock implementations of the three
//! collaborator traits. Mocks are `Clone`; clones share their counters, so
//! tests keep a probe clone before handing the original to the reconciler.

use drift_core::config::{
    DriftConfig, NotifierConfig, ProviderConfig, RecordConfig, ResolverConfig,
};
use drift_core::error::{Error, Result};
use drift_core::traits::{DnsProvider, IpResolver, Notifier, RecordRef, RecordSummary};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A resolver that always reports the same address
#[derive(Clone)]
pub struct StaticIpResolver {
    ip: String,
    calls: Arc<AtomicUsize>,
}

impl StaticIpResolver {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for StaticIpResolver {
    async fn resolve(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip.clone())
    }
}

/// A resolver whose lookups always fail
#[derive(Clone)]
pub struct FailingIpResolver {
    calls: Arc<AtomicUsize>,
}

impl FailingIpResolver {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for FailingIpResolver {
    async fn resolve(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::resolution("echo service unreachable"))
    }
}

/// A mock DnsProvider with scriptable behavior and call counters
#[derive(Clone)]
pub struct MockDnsProvider {
    token_active: bool,
    fail_verify: bool,
    fail_reads: bool,
    fail_writes: bool,
    confirmed_override: Option<String>,
    content: Arc<Mutex<String>>,
    verify_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
    write_calls: Arc<AtomicUsize>,
    written_values: Arc<Mutex<Vec<String>>>,
}

impl MockDnsProvider {
    /// Create a provider whose record currently holds `content`
    pub fn new(content: &str) -> Self {
        Self {
            token_active: true,
            fail_verify: false,
            fail_reads: false,
            fail_writes: false,
            confirmed_override: None,
            content: Arc::new(Mutex::new(content.to_string())),
            verify_calls: Arc::new(AtomicUsize::new(0)),
            read_calls: Arc::new(AtomicUsize::new(0)),
            write_calls: Arc::new(AtomicUsize::new(0)),
            written_values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report the credential as inactive
    pub fn with_inactive_token(mut self) -> Self {
        self.token_active = false;
        self
    }

    /// Fail the verification call itself
    pub fn with_failing_verify(mut self) -> Self {
        self.fail_verify = true;
        self
    }

    /// Fail every record read
    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Fail every record write
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Confirm writes with a fixed value instead of echoing the request
    pub fn with_confirmed_content(mut self, content: &str) -> Self {
        self.confirmed_override = Some(content.to_string());
        self
    }

    pub fn verify_call_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn read_call_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn write_call_count(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Get the content values passed to write_record(), in order
    pub fn written_values(&self) -> Vec<String> {
        self.written_values.lock().unwrap().clone()
    }

    /// Get the record content as currently stored
    pub fn stored_content(&self) -> String {
        self.content.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn verify_credential(&self) -> Result<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_verify {
            return Err(Error::provider("mock", "verification endpoint unavailable"));
        }
        Ok(self.token_active)
    }

    async fn read_record(&self, _record: &RecordRef) -> Result<String> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_reads {
            return Err(Error::provider("mock", "record read failed"));
        }
        Ok(self.content.lock().unwrap().clone())
    }

    async fn write_record(&self, _record: &RecordRef, new_ip: &str) -> Result<String> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes {
            return Err(Error::provider("mock", "record write failed"));
        }

        self.written_values.lock().unwrap().push(new_ip.to_string());
        *self.content.lock().unwrap() = new_ip.to_string();

        Ok(self
            .confirmed_override
            .clone()
            .unwrap_or_else(|| new_ip.to_string()))
    }

    async fn list_records(&self, _zone_id: &str) -> Result<Vec<RecordSummary>> {
        Ok(Vec::new())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A notifier that records every delivery attempt
#[derive(Clone)]
pub struct MockNotifier {
    fail: bool,
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            fail: false,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A notifier whose channel rejects every message
    pub fn failing() -> Self {
        Self {
            fail: true,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get every message handed to notify(), in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());

        if self.fail {
            return Err(Error::notification("channel rejected message"));
        }
        Ok(())
    }
}

/// Helper to create a minimal DriftConfig for testing
pub fn minimal_config() -> DriftConfig {
    DriftConfig {
        resolver: ResolverConfig::Http {
            url: "https://api.ipify.org/?format=json".to_string(),
        },
        provider: ProviderConfig::Cloudflare {
            api_token: "test-token".to_string(),
        },
        notifier: NotifierConfig::Telegram {
            bot_token: "test-bot".to_string(),
            chat_id: "42".to_string(),
        },
        record: RecordConfig::new("zone-1", "rec-1", "home.example.com"),
        // Shortest permitted interval so loop tests finish quickly
        poll_interval_secs: 1,
    }
}
