//! Entity identity shared by every sensor and actuator.

use crate::slug::SlugGenerator;

/// Base identity for a sensor or actuator.
///
/// The `name` is a human-readable label and carries no uniqueness
/// guarantee; the `slug` is unique for the owning controller run and is
/// the sole key used for command-target lookups. It is immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInfo {
    /// Human-readable label, e.g. `"Mash Tun"`.
    pub name: String,
    /// Unique dispatch key derived from the name (or an explicit override).
    pub slug: String,
}

impl EntityInfo {
    /// Build an identity, deriving the slug from `slug_hint` when given
    /// and from the name otherwise.
    pub fn new(name: impl Into<String>, slug_hint: Option<&str>, slugs: &mut SlugGenerator) -> Self {
        let name = name.into();
        let slug = slugs.assign(slug_hint.unwrap_or(&name));
        Self { name, slug }
    }
}
