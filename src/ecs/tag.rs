//! Tags
//!
//! A tag is a data-less marker attached to entities. Tags are minted at
//! runtime by name (layers create one each), so they can't be keyed by
//! `TypeId` like ordinary components. Each gets a process-unique id instead.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_TAG_ID: AtomicU32 = AtomicU32::new(0);

/// A named, process-unique entity marker.
///
/// Equality and hashing use the id only; the name is for diagnostics.
#[derive(Clone)]
pub struct Tag {
    id: u32,
    name: Arc<str>,
}

impl Tag {
    /// Mint a new tag. Two calls with the same name yield distinct tags.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Process-unique id.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({}#{})", self.name, self.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_distinct_tags() {
        let a = Tag::new("Enemy");
        let b = Tag::new("Enemy");
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_display_uses_name() {
        let tag = Tag::new("Layer7");
        assert_eq!(tag.to_string(), "Layer7");
    }
}
