//! Type-identity tags and ancestry linearization
//!
//! An error type's place in a declared hierarchy is described by a chain
//! of tags, most specific first. Chains are data, not reflection: the
//! ordering contract is explicit and testable.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one error type in an ancestry chain
///
/// Equality and hashing use the type identity only; the name is carried
/// for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTag {
    id: TypeId,
    name: &'static str,
}

impl ErrorTag {
    /// Tag for the concrete type `T`
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type name, for diagnostics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ErrorTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ErrorTag {}

impl Hash for ErrorTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Merge parent ancestry chains into one linearized chain
///
/// The result starts with `own`, then walks the parent chains depth-first,
/// left to right, keeping the first occurrence of each tag. For
/// multi-parent hierarchies the earlier parent chain wins ties.
#[must_use]
pub fn linearize(own: ErrorTag, parents: &[Vec<ErrorTag>]) -> Vec<ErrorTag> {
    let mut chain = vec![own];
    for parent in parents {
        for tag in parent {
            if !chain.contains(tag) {
                chain.push(*tag);
            }
        }
    }
    chain
}
