//! Command registry — chat command dispatch table.
//!
//! Populated once during controller construction, then wrapped in an
//! `Arc` and shared read-only with the dispatcher task, so no locking is
//! needed at resolution time.

use std::collections::HashMap;
use std::sync::Arc;

use brewery_domain::command::CommandTarget;
use brewery_domain::error::BreweryError;

/// A chat command handler.
///
/// The argument is the raw inbound message text; the return value is the
/// reply sent back to the channel.
pub type CommandHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Maps `command → target → ordered handlers`.
///
/// Duplicates are allowed: every sensor of a kind registers the same
/// command under the wildcard, which is exactly how one `/temp *`
/// broadcast reaches all of them.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, HashMap<CommandTarget, Vec<CommandHandler>>>,
}

impl CommandRegistry {
    /// Append `handler` to the list at `[command][target]`.
    ///
    /// Handlers are kept in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BreweryError::EmptyCommand`] for an empty command name —
    /// the only validation the registry performs.
    pub fn register(
        &mut self,
        command: &str,
        target: CommandTarget,
        handler: CommandHandler,
    ) -> Result<(), BreweryError> {
        if command.is_empty() {
            return Err(BreweryError::EmptyCommand);
        }
        self.commands
            .entry(command.to_string())
            .or_default()
            .entry(target)
            .or_default()
            .push(handler);
        Ok(())
    }

    /// Handlers for `command` aimed at `target`.
    ///
    /// Lookup is exact: a slug target yields only the handlers registered
    /// under that slug and never falls through to the wildcard list, so a
    /// slug-addressed command reaches each entity exactly once. An
    /// unknown command/target pair yields an empty vector, never an
    /// error.
    #[must_use]
    pub fn resolve(&self, command: &str, target: &CommandTarget) -> Vec<CommandHandler> {
        self.commands
            .get(command)
            .and_then(|targets| targets.get(target))
            .map(|list| list.iter().map(Arc::clone).collect())
            .unwrap_or_default()
    }

    /// Number of distinct command names registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Resolve and invoke every matching handler, joining replies with
/// newlines.
///
/// Returns `None` when nothing matched; callers treat that as a no-op,
/// not a fault.
#[must_use]
pub fn dispatch(
    registry: &CommandRegistry,
    command: &str,
    target: &CommandTarget,
    text: &str,
) -> Option<String> {
    let handlers = registry.resolve(command, target);
    if handlers.is_empty() {
        return None;
    }
    let replies: Vec<String> = handlers.iter().map(|handler| handler(text)).collect();
    Some(replies.join("\n"))
}
