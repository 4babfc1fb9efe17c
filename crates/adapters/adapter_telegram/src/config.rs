//! Telegram channel configuration.

use serde::Deserialize;

/// Configuration for the Telegram channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from `@BotFather`. Empty disables the channel.
    pub token: String,
    /// Chat ids allowed to issue commands; notifications go to each of
    /// them.
    ///
    /// When empty, every sender is accepted (convenient while testing)
    /// but outbound notifications have nowhere to go.
    pub users: Vec<i64>,
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            users: Vec::new(),
            poll_timeout_secs: 30,
        }
    }
}
