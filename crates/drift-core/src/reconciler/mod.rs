//! Core reconciliation loop
//!
//! The Reconciler is responsible for:
//! - Resolving the host's current public IP via IpResolver
//! - Reading the published record content via DnsProvider
//! - Rewriting the record when the two differ
//! - Reporting changes and failures via Notifier
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐              ┌──────────────┐
//! │ IpResolver  │── desired ──▶│  Reconciler  │◀── observed ──┐
//! └─────────────┘              └──────────────┘               │
//!                                      │                      │
//!                        ┌─────────────┴───────────┐          │
//!                        ▼                         ▼          │
//!                ┌──────────────┐          ┌──────────────────┴──┐
//!                │   Notifier   │          │    DnsProvider      │
//!                │   (report)   │          │  (read / write)     │
//!                └──────────────┘          └─────────────────────┘
//! ```
//!
//! ## Tick Flow
//!
//! 1. desired = resolver.resolve()
//! 2. observed = provider.read_record()
//! 3. desired == observed → idle, nothing else happens
//! 4. desired != observed → provider.write_record(), then one change
//!    notification, gated on the write succeeding
//! 5. Sleep the poll interval, repeat
//!
//! ## Error Policy
//!
//! A failed tick is logged, reported once through the notifier, and
//! abandoned; the loop retries on the next interval. Retry is solely a
//! property of the next tick — no backoff, no in-tick retries. The one
//! fatal condition is startup credential verification: the loop never
//! starts with a rejected credential, and the process exits nonzero.

use crate::config::DriftConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, IpResolver, Notifier, RecordRef};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of one reconciliation tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Published record already matches the public address; nothing written
    Idle {
        /// The address both sides agree on
        current: String,
    },

    /// Record was rewritten and the change notified
    Updated {
        /// Content the record held before the write
        previous: String,
        /// Content the record holds now
        new: String,
    },
}

/// Core reconciler
///
/// Orchestrates the resolve → read → compare → write → notify cycle on a
/// fixed interval. All operations within a tick are sequential and blocking:
/// each must complete (or fail) before the next begins, and at most one DNS
/// write happens per tick.
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Start with [`Reconciler::run()`] — verifies the credential, then loops
///    until the process is terminated
/// 3. Or embed it: call [`Reconciler::tick()`] directly to drive single
///    passes
///
/// ## Known Limitation
///
/// Two instances reconciling the same record race last-writer-wins; there is
/// no cross-process coordination.
pub struct Reconciler {
    /// Resolver for the desired public IP
    resolver: Box<dyn IpResolver>,

    /// Provider holding the published record
    provider: Box<dyn DnsProvider>,

    /// Out-of-band reporting channel
    notifier: Box<dyn Notifier>,

    /// The managed record
    record: RecordRef,

    /// Pause between ticks
    poll_interval: Duration,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `resolver`: Public-IP resolver implementation
    /// - `provider`: DNS provider implementation
    /// - `notifier`: Notification channel implementation
    /// - `config`: Drift configuration (validated here)
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        notifier: Box<dyn Notifier>,
        config: &DriftConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver,
            provider,
            notifier,
            record: RecordRef::new(
                config.record.zone_id.clone(),
                config.record.record_id.clone(),
                config.record.name.clone(),
            ),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        })
    }

    /// Verify the provider credential before entering the loop
    ///
    /// An inactive or unverifiable credential is fatal: the error is logged,
    /// reported once through the notifier, and returned. No record read or
    /// write happens before this check passes.
    pub async fn verify_startup(&self) -> Result<()> {
        match self.provider.verify_credential().await {
            Ok(true) => {
                info!(
                    "{} credential verified, managing record {}",
                    self.provider.provider_name(),
                    self.record.name
                );
                Ok(())
            }
            Ok(false) => {
                error!("{} credential is not active", self.provider.provider_name());
                self.notify_best_effort("DNS provider credential is not active")
                    .await;
                Err(crate::Error::auth("credential is not active"))
            }
            Err(e) => {
                error!("credential verification failed: {}", e);
                self.notify_best_effort(&format!("Credential verification failed: {}", e))
                    .await;
                Err(e)
            }
        }
    }

    /// Run one reconciliation tick
    ///
    /// Resolves the desired address, reads the observed record content, and
    /// writes the record only when the two differ. Exactly one change
    /// notification fires per successful write; a failed step logs a
    /// diagnostic, sends one failure notification, and abandons the tick.
    pub async fn tick(&self) -> Result<TickOutcome> {
        let desired = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                error!("public IP lookup failed: {}", e);
                self.notify_best_effort(&format!("Public IP lookup failed: {}", e))
                    .await;
                return Err(e);
            }
        };
        debug!("public IP: {}", desired);

        let observed = match self.provider.read_record(&self.record).await {
            Ok(content) => content,
            Err(e) => {
                error!("failed to read record {}: {}", self.record.name, e);
                self.notify_best_effort(&format!(
                    "Failed to read DNS record {}: {}",
                    self.record.name, e
                ))
                .await;
                return Err(e);
            }
        };

        // Byte-for-byte comparison, no address parsing: "1.2.3.4" and
        // "01.2.3.4" are different values here.
        if desired == observed {
            info!("record {} already current at {}", self.record.name, desired);
            return Ok(TickOutcome::Idle { current: desired });
        }

        let confirmed = match self.provider.write_record(&self.record, &desired).await {
            Ok(content) => content,
            Err(e) => {
                error!("failed to update record {}: {}", self.record.name, e);
                self.notify_best_effort(&format!(
                    "Failed to update DNS record {}: {}",
                    self.record.name, e
                ))
                .await;
                return Err(e);
            }
        };

        if confirmed != desired {
            warn!(
                "provider confirmed content {} for record {}, expected {}",
                confirmed, self.record.name, desired
            );
        }

        info!(
            "record {} changed from {} to {}",
            self.record.name, observed, desired
        );
        self.notify_best_effort(&format!("IP changed from {} to {}", observed, desired))
            .await;

        Ok(TickOutcome::Updated {
            previous: observed,
            new: desired,
        })
    }

    /// Run the reconciler
    ///
    /// Verifies the credential, then ticks on the configured interval until
    /// the process receives a termination signal. A failed tick does not
    /// stop the loop.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown on signal
    /// - `Err(Error)`: Fatal startup error (credential rejected)
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    ///
    /// # Parameters
    ///
    /// - `shutdown_rx`: Optional oneshot receiver to trigger shutdown (for testing)
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.verify_startup().await?;

        info!(
            "starting reconciliation loop (record: {}, interval: {:?})",
            self.record.name, self.poll_interval
        );

        if let Some(mut rx) = shutdown_rx {
            // Test mode: sleep against the provided shutdown signal
            loop {
                if let Err(e) = self.tick().await {
                    debug!("tick abandoned, retrying next interval: {}", e);
                }

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            // Production mode: sleep against SIGINT
            loop {
                if let Err(e) = self.tick().await {
                    debug!("tick abandoned, retrying next interval: {}", e);
                }

                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Send a notification without letting its failure surface
    ///
    /// A failed notification must never mask or replace the condition it was
    /// reporting, and notifying about a notification failure would recurse.
    /// One attempt, then a warning.
    async fn notify_best_effort(&self, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            warn!("notification failed: {}", e);
        }
    }

    /// Test-only helper to run the reconciler with a controlled shutdown signal
    ///
    /// # Visibility
    ///
    /// This is `pub` for testing purposes only. Production daemon code should
    /// use `run()` instead, which manages shutdown via OS signals.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}
