//! Framework-free core for declarative error-to-response mapping
//!
//! Defines the type-identity tags and ancestry contract for mappable
//! errors, the translator contract with its built-in defaults, and the
//! pure status policy shared by the resolution engine.

pub mod error;
pub mod policy;
pub mod tag;
pub mod translator;

pub use error::MappedError;
pub use policy::UnsupportedStatus;
pub use tag::{ErrorTag, linearize};
pub use translator::{ErrorPayload, MaskedErrorTranslator, SimpleErrorTranslator, Translator};
