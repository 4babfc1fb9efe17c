//! Telegram adapter errors.

/// Failures talking to the Bot API.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// Transport-level failure (connect, timeout, malformed body).
    #[error("telegram transport error")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`.
    #[error("telegram API rejected the call: {description}")]
    Api {
        /// Description echoed from the API response.
        description: String,
    },
}

/// Build an [`TelegramError::Api`] from the envelope's optional
/// description.
pub(crate) fn api_error(description: Option<String>) -> TelegramError {
    TelegramError::Api {
        description: description.unwrap_or_else(|| "no description".to_string()),
    }
}
