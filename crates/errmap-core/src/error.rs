//! Contract for application errors that participate in error maps

use std::error::Error;

use crate::tag::ErrorTag;

/// An application error that can be matched against an error map
///
/// Implementors declare their own type tag and, when the type has
/// declared ancestors, a linearized ancestry chain. There is no implicit
/// universal base tag, so an empty map never matches anything.
pub trait MappedError: Error + Send + Sync + 'static {
    /// The error's own type tag
    ///
    /// Wrapper enums usually return the tag of the wrapped variant type,
    /// so each variant matches its own map entry.
    fn tag(&self) -> ErrorTag;

    /// Linearized ancestor tags, most specific first
    ///
    /// The chain starts with [`MappedError::tag`] and continues through
    /// declared ancestors in linearization order; use
    /// [`linearize`](crate::tag::linearize) to compose parent chains.
    /// Enums may return a different chain per variant.
    fn ancestry(&self) -> Vec<ErrorTag> {
        vec![self.tag()]
    }
}
