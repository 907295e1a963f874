// # drift-core
//
// Core library for the drift DNS reconciler.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping a single DNS "A"
// record pointed at the host's current public address:
// - **IpResolver**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for verifying credentials and reading/writing the
//   managed record via a provider API
// - **Notifier**: Trait for best-effort out-of-band reporting
// - **Reconciler**: Fixed-interval resolve → read → compare → write → notify
//   loop that orchestrates the three collaborators
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The loop policy lives here; transports live
//    in the implementation crates
// 2. **Explicit Wiring**: Collaborators are constructed once at startup from
//    an explicit configuration value, no ambient global state
// 3. **Library-First**: The reconciler can be embedded and driven tick by
//    tick without the daemon
// 4. **Single Record**: One record per process; the provider's stored value
//    is the only durable state

pub mod config;
pub mod error;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::{DriftConfig, NotifierConfig, ProviderConfig, RecordConfig, ResolverConfig};
pub use error::{Error, Result};
pub use reconciler::{Reconciler, TickOutcome};
pub use traits::{DnsProvider, IpResolver, Notifier, RecordRef, RecordSummary};
