// # Notifier Trait
//
// Defines the interface for sending out-of-band text notifications.
//
// ## Implementations
//
// - Telegram: `drift-notify-telegram` crate

use async_trait::async_trait;

/// Trait for notification channel implementations
///
/// Delivery is best-effort and synchronous with no retry. The reconciler
/// never consults the result for control flow: a failed notification is
/// logged and swallowed, because escalating it would recurse into notifying
/// about a notification failure.
///
/// Implementations are responsible for whatever text encoding their
/// transport requires; callers hand over plain text.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a plain-text message to the configured channel/recipient.
    async fn notify(&self, message: &str) -> Result<(), crate::Error>;
}
