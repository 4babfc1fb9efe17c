//! Command-target selection — a specific entity slug or the wildcard.

use std::fmt;

/// The reserved token that selects every entity registered under it.
pub const WILDCARD: &str = "*";

/// Where a chat command should be routed.
///
/// Entities register their commands twice: under their own slug (so one
/// instance can be addressed) and under [`CommandTarget::Wildcard`] (so a
/// single command can be broadcast to every instance of a capability).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandTarget {
    /// A single entity, addressed by its unique slug.
    Slug(String),
    /// Every entity that registered under the wildcard.
    Wildcard,
}

impl CommandTarget {
    /// Build a slug target.
    pub fn slug(slug: impl Into<String>) -> Self {
        Self::Slug(slug.into())
    }

    /// Parse an inbound target token; `*` means the wildcard.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            Self::Wildcard
        } else {
            Self::Slug(raw.to_string())
        }
    }
}

impl fmt::Display for CommandTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => f.write_str(slug),
            Self::Wildcard => f.write_str(WILDCARD),
        }
    }
}
