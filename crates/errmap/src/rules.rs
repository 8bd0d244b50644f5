//! Rule declarations, the per-route error map, and process-wide defaults

use std::collections::{HashMap, hash_map};
use std::sync::Arc;

use errmap_core::{ErrorTag, MappedError, MaskedErrorTranslator, SimpleErrorTranslator, Translator};

use crate::work::OnError;

/// Response rule declared for one error type
///
/// The status is validated lazily at resolution time, so a misdeclared
/// rule surfaces on the first matching error, not at construction.
#[derive(Clone)]
pub struct Rule {
    status: u16,
    translator: Option<Arc<dyn Translator>>,
    on_error: Option<OnError>,
}

impl Rule {
    /// Rule targeting `status`, translated by the status-class default
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            translator: None,
            on_error: None,
        }
    }

    /// Replace the default translator with an explicit one
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Attach a side-effect callback, run once per handled error
    #[must_use]
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// Declared status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Explicit translator, if one was declared
    #[must_use]
    pub fn translator(&self) -> Option<&Arc<dyn Translator>> {
        self.translator.as_ref()
    }

    /// Declared callback, if any
    #[must_use]
    pub fn on_error(&self) -> Option<&OnError> {
        self.on_error.as_ref()
    }
}

/// One declared mapping: a bare status shorthand or a full rule
#[derive(Clone)]
pub enum MapEntry {
    /// Shorthand; the defaults supply the translator and callback
    Status(u16),
    /// Full rule, used exactly as declared
    Rule(Rule),
}

impl From<u16> for MapEntry {
    fn from(status: u16) -> Self {
        Self::Status(status)
    }
}

impl From<Rule> for MapEntry {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

/// Per-route table from error type to response rule
///
/// Lookup order is driven by the raised error's ancestry, never by
/// declaration order. Immutable once the route is registered.
#[derive(Clone, Default)]
pub struct ErrorMap {
    entries: HashMap<ErrorTag, MapEntry>,
}

impl ErrorMap {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the mapping for error type `E`
    ///
    /// Accepts a bare status code or a full [`Rule`]; redeclaring a type
    /// replaces its entry.
    #[must_use]
    pub fn entry<E: MappedError>(mut self, entry: impl Into<MapEntry>) -> Self {
        self.entries.insert(ErrorTag::of::<E>(), entry.into());
        self
    }

    /// Entry declared for `tag`, if any
    #[must_use]
    pub fn get(&self, tag: ErrorTag) -> Option<&MapEntry> {
        self.entries.get(&tag)
    }

    /// Returns true if no mappings are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the declared entries
    #[must_use]
    pub fn iter(&self) -> hash_map::Iter<'_, ErrorTag, MapEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = (&'a ErrorTag, &'a MapEntry);
    type IntoIter = hash_map::Iter<'a, ErrorTag, MapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Process-wide default translators and callback
///
/// Configured once at router construction and passed down explicitly to
/// every resolution; there is no ambient lookup.
#[derive(Clone)]
pub struct Defaults {
    /// Translator substituted for 4xx rules without an explicit one
    pub client_error_translator: Arc<dyn Translator>,
    /// Translator substituted for 5xx rules without an explicit one
    pub server_error_translator: Arc<dyn Translator>,
    /// Callback attached to bare-status entries
    pub on_error: Option<OnError>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            client_error_translator: Arc::new(SimpleErrorTranslator),
            server_error_translator: Arc::new(MaskedErrorTranslator),
            on_error: None,
        }
    }
}

impl Defaults {
    /// Replace the client-error translator
    #[must_use]
    pub fn with_client_error_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.client_error_translator = translator;
        self
    }

    /// Replace the server-error translator
    #[must_use]
    pub fn with_server_error_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.server_error_translator = translator;
        self
    }

    /// Attach a callback for bare-status entries
    #[must_use]
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = Some(on_error);
        self
    }
}
