//! Rule resolution: pick the single applicable rule for a raised error

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use thiserror::Error;

use errmap_core::policy::{pick_translator_for_status, validate_error_status};
use errmap_core::{ErrorTag, MappedError, Translator};

use crate::rules::{Defaults, ErrorMap, MapEntry};
use crate::work::OnError;

/// Rule selected for one raised error, with the status validated and a
/// translator always present
///
/// Ephemeral: created fresh per error, discarded after the response.
pub struct ResolvedRule {
    /// Validated response status, always 4xx or 5xx
    pub status: StatusCode,
    /// Translator producing the response payload
    pub translator: Arc<dyn Translator>,
    /// Side-effect callback, if any
    pub on_error: Option<OnError>,
}

impl fmt::Debug for ResolvedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRule")
            .field("status", &self.status)
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

/// Failure to resolve a rule for a raised error
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// No declared entry matches any tag in the error's ancestry
    #[error("no rule declared for raised error type {raised}")]
    Unmapped {
        /// Tag of the raised error
        raised: ErrorTag,
    },
    /// The matching entry declares a status outside the error ranges
    #[error("unsupported status {status} declared for {raised}, use 4xx or 5xx")]
    InvalidStatus {
        /// The offending declared status
        status: u16,
        /// Tag of the raised error
        raised: ErrorTag,
    },
}

/// Select the applicable rule for a raised error
///
/// Walks the error's ancestry most-specific-first and takes the first
/// declared entry. A bare-status entry synthesizes a rule carrying the
/// defaults' callback; a full rule is used exactly as declared. The
/// declared status is validated, and a missing translator is substituted
/// by status class.
///
/// # Errors
///
/// [`ResolveError::Unmapped`] if no ancestry tag has an entry;
/// [`ResolveError::InvalidStatus`] if the matching entry declares a
/// status outside 4xx/5xx.
pub fn resolve_rule_for_error(
    error: &dyn MappedError,
    error_map: &ErrorMap,
    defaults: &Defaults,
) -> Result<ResolvedRule, ResolveError> {
    let matched = error
        .ancestry()
        .into_iter()
        .find_map(|tag| error_map.get(tag));

    let Some(entry) = matched else {
        return Err(ResolveError::Unmapped {
            raised: error.tag(),
        });
    };

    let (status, translator, on_error) = match entry {
        MapEntry::Status(status) => (*status, None, defaults.on_error.clone()),
        MapEntry::Rule(rule) => (
            rule.status(),
            rule.translator().cloned(),
            rule.on_error().cloned(),
        ),
    };

    let validated = validate_error_status(status).map_err(|_| ResolveError::InvalidStatus {
        status,
        raised: error.tag(),
    })?;

    let translator = translator.unwrap_or_else(|| {
        pick_translator_for_status(
            status,
            &defaults.client_error_translator,
            &defaults.server_error_translator,
        )
    });

    Ok(ResolvedRule {
        status: validated,
        translator,
        on_error,
    })
}
