//! Collision-resolving slug generation.
//!
//! Each controller run owns exactly one [`SlugGenerator`], so slugs are
//! unique across every entity created during that run and independent
//! controllers (e.g. in tests) never interfere with each other.

use std::collections::HashSet;

/// Issues unique slugs for entity names.
///
/// Slug generation never fails: a collision with a previously issued slug
/// is resolved by appending `-1`, `-2`, … deterministically.
#[derive(Debug, Default)]
pub struct SlugGenerator {
    issued: HashSet<String>,
}

impl SlugGenerator {
    /// Create a fresh generator with no issued slugs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a unique slug from `hint` and record it as issued.
    pub fn assign(&mut self, hint: &str) -> String {
        let base = slugify(hint);
        if self.issued.insert(base.clone()) {
            return base;
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}-{suffix}");
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// Normalize a name into slug form: lowercase, alphanumeric runs joined
/// by single dashes, no leading/trailing dash.
fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        // A name made entirely of punctuation still gets a usable slug.
        slug.push_str("entity");
    }
    slug
}
