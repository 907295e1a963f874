// # driftd - drift daemon
//
// Thin integration layer: reads configuration from environment variables,
// initializes the runtime, wires the resolver, provider, and notifier into
// the reconciler, and runs it. All reconciliation logic lives in drift-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### DNS Provider
// - `DRIFT_API_TOKEN`: Cloudflare API token (required)
// - `DRIFT_ZONE_ID`: Zone identifier (required)
// - `DRIFT_RECORD_ID`: Record identifier (required)
// - `DRIFT_RECORD_NAME`: Record DNS name, supplied on writes (required)
//
// ### Notification Channel
// - `DRIFT_TELEGRAM_BOT_TOKEN`: Telegram bot API key (required)
// - `DRIFT_TELEGRAM_CHAT_ID`: Telegram chat to notify (required)
//
// ### Reconciler
// - `DRIFT_POLL_INTERVAL_SECS`: Seconds between ticks (optional, default 300)
// - `DRIFT_IP_ECHO_URL`: Public-IP echo service URL (optional)
// - `DRIFT_LOG_LEVEL`: trace|debug|info|warn|error (optional, default info)
//
// ## Example
//
// ```bash
// export DRIFT_API_TOKEN=your_token
// export DRIFT_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export DRIFT_RECORD_ID=372e67954025e0ba6aaa6d586b9e0b59
// export DRIFT_RECORD_NAME=home.example.com
// export DRIFT_TELEGRAM_BOT_TOKEN=123456:bot_key
// export DRIFT_TELEGRAM_CHAT_ID=987654321
//
// driftd
// ```
//
// ## Known Limitation
//
// Running several driftd instances against the same record is
// last-writer-wins; there is no cross-process coordination.

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use drift_core::{
    DriftConfig, NotifierConfig, ProviderConfig, Reconciler, RecordConfig, ResolverConfig,
    config::DEFAULT_POLL_INTERVAL_SECS,
};
use drift_ip_http::{DEFAULT_IP_ECHO_URL, HttpIpResolver};
use drift_notify_telegram::TelegramNotifier;
use drift_provider_cloudflare::CloudflareDns;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (startup-fatal, e.g. rejected credential)
#[derive(Debug, Clone, Copy)]
enum DriftExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DriftExitCode> for ExitCode {
    fn from(code: DriftExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_token: String,
    zone_id: String,
    record_id: String,
    record_name: String,
    telegram_bot_token: String,
    telegram_chat_id: String,
    poll_interval_secs: u64,
    ip_echo_url: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: require("DRIFT_API_TOKEN")?,
            zone_id: require("DRIFT_ZONE_ID")?,
            record_id: require("DRIFT_RECORD_ID")?,
            record_name: require("DRIFT_RECORD_NAME")?,
            telegram_bot_token: require("DRIFT_TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: require("DRIFT_TELEGRAM_CHAT_ID")?,
            poll_interval_secs: match env::var("DRIFT_POLL_INTERVAL_SECS") {
                Ok(raw) => raw.parse().map_err(|_| {
                    anyhow::anyhow!("DRIFT_POLL_INTERVAL_SECS is not a number: {}", raw)
                })?,
                Err(_) => DEFAULT_POLL_INTERVAL_SECS,
            },
            ip_echo_url: env::var("DRIFT_IP_ECHO_URL")
                .unwrap_or_else(|_| DEFAULT_IP_ECHO_URL.to_string()),
            log_level: env::var("DRIFT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Catches the common deployment mistakes before any network call:
    /// placeholder tokens, malformed record names, out-of-range intervals.
    fn validate(&self) -> Result<()> {
        // Cloudflare API tokens are typically 40 characters alphanumeric
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "DRIFT_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DRIFT_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        validate_domain_name(&self.record_name)?;

        if !(1..=86400).contains(&self.poll_interval_secs) {
            anyhow::bail!(
                "DRIFT_POLL_INTERVAL_SECS must be between 1 and 86400 seconds. Got: {}",
                self.poll_interval_secs
            );
        }

        if !self.ip_echo_url.starts_with("https://") && !self.ip_echo_url.starts_with("http://") {
            anyhow::bail!(
                "DRIFT_IP_ECHO_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_echo_url
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DRIFT_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Read a required environment variable with a setup hint on failure
fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => anyhow::bail!("{name} is required. Set it via: export {name}=..."),
    }
}

/// Validate that a string is a valid domain name
///
/// This implements basic DNS domain name validation per RFC 1035.
/// It's not comprehensive but catches common errors.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    // Split into labels and validate each
    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DriftExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DriftExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DriftExitCode::ConfigError.into();
    }

    info!("Starting driftd daemon");
    info!("Managing record: {}", config.record_name);

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DriftExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DriftExitCode::RuntimeError
        } else {
            DriftExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the collaborators into the reconciler and run it
async fn run_daemon(config: Config) -> Result<()> {
    let drift_config = DriftConfig {
        resolver: ResolverConfig::Http {
            url: config.ip_echo_url.clone(),
        },
        provider: ProviderConfig::Cloudflare {
            api_token: config.api_token.clone(),
        },
        notifier: NotifierConfig::Telegram {
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
        },
        record: RecordConfig::new(config.zone_id, config.record_id, config.record_name),
        poll_interval_secs: config.poll_interval_secs,
    };

    let resolver = Box::new(HttpIpResolver::new(config.ip_echo_url));
    let provider = Box::new(CloudflareDns::new(config.api_token));
    let notifier = Box::new(TelegramNotifier::new(
        config.telegram_bot_token,
        config.telegram_chat_id,
    ));

    let reconciler = Reconciler::new(resolver, provider, notifier, &drift_config)?;

    info!("Starting reconciler");
    reconciler.run().await?;

    Ok(())
}
