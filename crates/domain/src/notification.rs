//! Notification — a transient message queued for the chat channel.

/// An outbound message with an opaque severity tag.
///
/// Created when an alarm fires (or as the startup smoke test), held in the
/// controller's queue, and consumed on delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text handed verbatim to the channel.
    pub message: String,
    /// Severity tag; its meaning belongs to the channel, not the core.
    pub priority: u8,
}

impl Notification {
    /// Create a notification.
    pub fn new(message: impl Into<String>, priority: u8) -> Self {
        Self {
            message: message.into(),
            priority,
        }
    }
}
