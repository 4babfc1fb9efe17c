//! # brewery-adapter-telegram
//!
//! The chat transport: outbound notification delivery plus the inbound
//! command dispatcher.
//!
//! Inbound text has the shape `<command> [target]` — e.g. `/temp mash-tun`
//! or `/flow *`. A missing target means the wildcard. The dispatcher
//! resolves through the command registry populated at controller
//! construction; text that matches no registration is silently ignored.
//!
//! ## Dependency rule
//!
//! Depends on `brewery-app` (registry, channel port) and
//! `brewery-domain` only; the core never sees reqwest or the wire types.

mod api;
pub mod config;
mod error;

pub use config::TelegramConfig;
pub use error::TelegramError;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use brewery_app::ports::NotificationChannel;
use brewery_app::registry::{CommandRegistry, dispatch};
use brewery_domain::command::CommandTarget;
use brewery_domain::error::BreweryError;
use brewery_domain::notification::Notification;

use api::{ApiResponse, Update};
use error::api_error;

const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Telegram Bot API channel.
pub struct TelegramChannel {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramChannel {
    /// Build a channel from its configuration.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Long-poll `getUpdates` forever, dispatching inbound commands
    /// through `registry` and replying with the joined handler output.
    ///
    /// Transport errors back off exponentially and retry; this task never
    /// gives up on its own.
    pub async fn run_dispatcher(self: Arc<Self>, registry: Arc<CommandRegistry>) {
        tracing::info!(
            users = self.config.users.len(),
            commands = registry.len(),
            "telegram dispatcher listening"
        );
        let mut offset = 0i64;
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.get_updates(offset).await {
                Ok(updates) => {
                    backoff = INITIAL_BACKOFF;
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.handle_update(update, &registry).await;
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "getUpdates failed, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    async fn handle_update(&self, update: Update, registry: &CommandRegistry) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let sender = message.from.map(|user| user.id);
        if !self.is_allowed(sender) {
            tracing::warn!(?sender, "sender outside the allow-list, ignoring");
            return;
        }
        let Some((command, target)) = parse_command(text) else {
            tracing::debug!(text, "not a command, ignoring");
            return;
        };
        match dispatch(registry, command, &target, text) {
            Some(reply) => {
                if let Err(err) = self.send_message(message.chat.id, &reply).await {
                    tracing::warn!(%err, chat = message.chat.id, "failed to send reply");
                }
            }
            None => tracing::debug!(command, %target, "no handlers registered, ignoring"),
        }
    }

    /// Whether a sender may issue commands. An empty allow-list accepts
    /// everyone; an anonymous message never passes a non-empty list.
    fn is_allowed(&self, sender: Option<i64>) -> bool {
        if self.config.users.is_empty() {
            return true;
        }
        sender.is_some_and(|id| self.config.users.contains(&id))
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let poll_timeout = self.config.poll_timeout_secs;
        let response: ApiResponse<Vec<Update>> = self
            .client
            .get(self.url("getUpdates"))
            .query(&[("offset", offset), ("timeout", poll_timeout.cast_signed())])
            .timeout(Duration::from_secs(poll_timeout + 10))
            .send()
            .await?
            .json()
            .await?;
        if response.ok {
            Ok(response.result.unwrap_or_default())
        } else {
            Err(api_error(response.description))
        }
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let response: ApiResponse<serde_json::Value> = self
            .client
            .post(self.url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?
            .json()
            .await?;
        if response.ok {
            Ok(())
        } else {
            Err(api_error(response.description))
        }
    }

    fn url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.config.token)
    }
}

impl NotificationChannel for TelegramChannel {
    fn send_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BreweryError>> + Send {
        async move {
            if self.config.users.is_empty() {
                tracing::warn!("no allow-listed users, dropping notification");
                return Ok(());
            }
            for &chat_id in &self.config.users {
                self.send_message(chat_id, &notification.message)
                    .await
                    .map_err(|err| BreweryError::Channel(Box::new(err)))?;
            }
            Ok(())
        }
    }
}

/// Split inbound text into a command and its target.
///
/// The first whitespace-separated token must start with `/`; the second,
/// when present, selects the target (`*` or a slug). A missing target
/// broadcasts via the wildcard.
fn parse_command(text: &str) -> Option<(&str, CommandTarget)> {
    let mut parts = text.split_whitespace();
    let command = parts.next()?;
    if !command.starts_with('/') {
        return None;
    }
    let target = parts
        .next()
        .map_or(CommandTarget::Wildcard, CommandTarget::parse);
    Some((command, target))
}
