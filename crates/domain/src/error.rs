//! Common error types used across the workspace.

/// Top-level error for the brewing controller.
///
/// Slug collisions and transient hardware-read failures are deliberately
/// absent: both are absorbed where they happen and never surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum BreweryError {
    /// A required configuration option was missing when building an entity.
    #[error("{entity}: missing required option `{option}`")]
    MissingOption {
        /// Name of the entity that could not be built.
        entity: String,
        /// The option that was expected (e.g. `gpio`).
        option: &'static str,
    },

    /// An empty command name was handed to the registry.
    #[error("cannot register an empty command name")]
    EmptyCommand,

    /// Failure delivering a notification through the chat transport.
    #[error("notification channel error: {0}")]
    Channel(#[source] Box<dyn std::error::Error + Send + Sync>),
}
