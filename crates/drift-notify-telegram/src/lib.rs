// # Telegram Notifier
//
// This crate provides a Telegram Bot API notification channel for the drift
// reconciler.
//
// Messages are delivered through the `sendMessage` endpoint as a GET with
// the text in the query string, the way the Bot API accepts it:
//
// ```http
// GET /bot<token>/sendMessage?chat_id=<chat>&text=<encoded>
// ```
//
// Delivery is best-effort and single-shot. The reconciler swallows failures;
// this crate only reports them.

use async_trait::async_trait;
use drift_core::traits::Notifier;
use drift_core::{Error, Result};
use std::time::Duration;

/// Telegram Bot API base URL
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// HTTP timeout for send-message requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Collapse runs of whitespace into a literal `%20` separator
///
/// The Bot API accepts the message text in a URL query string; words joined
/// with `%20` survive that transport. Only whitespace is rewritten — other
/// characters pass through untouched, so this is a query-text encoding, not
/// general percent-encoding.
pub fn encode_text(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join("%20")
}

/// Telegram notification channel
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the bot token.
pub struct TelegramNotifier {
    /// Bot API key
    /// ⚠️ NEVER log this value (it is embedded in request URLs)
    bot_token: String,

    /// Chat to deliver messages to
    chat_id: String,

    /// HTTP client
    client: reqwest::Client,
}

// Custom Debug implementation that hides the bot token
impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    ///
    /// # Parameters
    ///
    /// - `bot_token`: Bot API key
    /// - `chat_id`: Recipient chat identifier
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Build the send-message URL for a message
    ///
    /// The URL embeds the bot token; it must never be logged.
    fn send_url(&self, message: &str) -> String {
        format!(
            "{TELEGRAM_API_BASE}/bot{}/sendMessage?chat_id={}&text={}",
            self.bot_token,
            self.chat_id,
            encode_text(message)
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let url = self.send_url(message);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::notification(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::notification(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        tracing::debug!("notification delivered to chat {}", self.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_joins_words_with_percent20() {
        assert_eq!(
            encode_text("IP changed from 1.2.3.4 to 5.6.7.8"),
            "IP%20changed%20from%201.2.3.4%20to%205.6.7.8"
        );
    }

    #[test]
    fn test_encode_text_collapses_whitespace_runs() {
        assert_eq!(encode_text("a  b\t\tc\nd"), "a%20b%20c%20d");
        assert_eq!(encode_text("  leading and trailing  "), "leading%20and%20trailing");
    }

    #[test]
    fn test_encode_text_leaves_other_characters_alone() {
        assert_eq!(encode_text("status: 100%"), "status:%20100%");
    }

    #[test]
    fn test_send_url_carries_chat_and_encoded_text() {
        let notifier = TelegramNotifier::new("bot-key", "1234");
        let url = notifier.send_url("IP changed from 1.2.3.4 to 5.6.7.8");

        assert!(url.starts_with("https://api.telegram.org/botbot-key/sendMessage"));
        assert!(url.contains("chat_id=1234"));
        assert!(url.ends_with("text=IP%20changed%20from%201.2.3.4%20to%205.6.7.8"));
    }

    #[test]
    fn test_bot_token_not_exposed_in_debug() {
        let notifier = TelegramNotifier::new("secret_bot_token", "1234");

        let debug_str = format!("{:?}", notifier);
        assert!(!debug_str.contains("secret_bot_token"));
        assert!(debug_str.contains("TelegramNotifier"));
        assert!(debug_str.contains("1234"));
    }
}
