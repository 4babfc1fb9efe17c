//! Notification channel port — outbound delivery to the chat transport.

use std::future::Future;
use std::sync::Arc;

use brewery_domain::error::BreweryError;
use brewery_domain::notification::Notification;

/// Outbound side of the chat transport.
///
/// The inbound side (long-polling, command parsing) belongs entirely to
/// the adapter; the core only hands it the populated command registry.
pub trait NotificationChannel: Send + Sync {
    /// Deliver one notification. May block on network IO.
    fn send_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BreweryError>> + Send;
}

impl<T: NotificationChannel> NotificationChannel for Arc<T> {
    fn send_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BreweryError>> + Send {
        T::send_notification(self, notification)
    }
}

/// Channel that logs notifications instead of delivering them.
///
/// Used by the binary when no chat transport is configured.
pub struct LogChannel;

impl NotificationChannel for LogChannel {
    fn send_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), BreweryError>> + Send {
        tracing::info!(
            priority = notification.priority,
            message = %notification.message,
            "notification"
        );
        async { Ok(()) }
    }
}
