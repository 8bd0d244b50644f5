//! The error-handling wrapper around one route handler

use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use errmap_core::MappedError;

use crate::resolve::{ResolveError, resolve_rule_for_error};
use crate::rules::{Defaults, ErrorMap};
use crate::work::Work;

/// Translated error awaiting JSON encoding by the routing layer
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// Response status from the resolved rule
    pub status: StatusCode,
    /// Payload object produced by the translator
    pub payload: Value,
}

/// What one wrapped handler invocation produced
#[derive(Debug)]
pub enum Outcome<R> {
    /// The handler succeeded; its value passes through untouched
    Success(R),
    /// The handler failed with a mapped error, translated for encoding
    Error(ErrorResponse),
}

/// Escalation out of the wrapper, handed to the routing layer's generic
/// unhandled-error path
#[derive(Debug, Error)]
pub enum HandlingError {
    /// The raised error had no mapping; re-surfaced untouched
    #[error(transparent)]
    Original(Arc<dyn MappedError>),
    /// The route's declared mapping is itself broken
    #[error("error map misconfigured: {0}")]
    Configuration(#[from] ResolveError),
}

/// Wraps one route handler with declarative error mapping
///
/// The handler runs under its declared scheduling capability. On failure
/// the raised error is resolved against the route's map, the resolved
/// callback runs exactly once, and the translator builds the response
/// payload.
pub struct ErrorMapped<In, R, E> {
    handler: Work<In, Result<R, E>>,
    error_map: ErrorMap,
    warn_on_unmapped: bool,
    defaults: Defaults,
}

impl<In, R, E> ErrorMapped<In, R, E>
where
    In: Send + 'static,
    R: Send + 'static,
    E: MappedError,
{
    /// Wrap `handler` with the route's error map
    ///
    /// With `warn_on_unmapped` set, an unmapped error escalates as a loud
    /// configuration error instead of re-surfacing the original.
    pub fn new(
        handler: Work<In, Result<R, E>>,
        error_map: ErrorMap,
        warn_on_unmapped: bool,
        defaults: Defaults,
    ) -> Self {
        Self {
            handler,
            error_map,
            warn_on_unmapped,
            defaults,
        }
    }

    /// Run the handler once, mapping any raised error
    ///
    /// # Errors
    ///
    /// [`HandlingError::Original`] re-surfaces an unmapped error when
    /// `warn_on_unmapped` is off; [`HandlingError::Configuration`]
    /// reports a broken declaration (invalid status, or unmapped with
    /// `warn_on_unmapped` on).
    pub async fn run(&self, input: In) -> Result<Outcome<R>, HandlingError> {
        let error: Arc<dyn MappedError> = match self.handler.call(input).await {
            Ok(value) => return Ok(Outcome::Success(value)),
            Err(error) => Arc::new(error),
        };

        let rule = match resolve_rule_for_error(error.as_ref(), &self.error_map, &self.defaults) {
            Ok(rule) => rule,
            Err(resolve_error) => return Err(self.escalate(error, resolve_error)),
        };

        if let Some(on_error) = &rule.on_error {
            on_error.call(Arc::clone(&error)).await;
        }

        let payload = rule.translator.from_error(error.as_ref());
        tracing::debug!(status = %rule.status, %error, "translated error response");

        Ok(Outcome::Error(ErrorResponse {
            status: rule.status,
            payload,
        }))
    }

    fn escalate(&self, error: Arc<dyn MappedError>, resolve_error: ResolveError) -> HandlingError {
        match resolve_error {
            ResolveError::Unmapped { .. } if !self.warn_on_unmapped => {
                HandlingError::Original(error)
            }
            other => HandlingError::Configuration(other),
        }
    }
}
