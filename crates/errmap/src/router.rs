//! Route registration with declarative error mapping

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{MethodFilter, on};
use http::{Method, StatusCode};
use schemars::Schema;
use serde_json::Value;

use errmap_core::MappedError;
use errmap_core::policy::pick_translator_for_status;

use crate::handling::{ErrorMapped, HandlingError, Outcome};
use crate::rules::{Defaults, ErrorMap, MapEntry};
use crate::work::Work;

/// Per-route error-mapping options
#[derive(Clone, Default)]
pub struct RouteConfig {
    error_map: ErrorMap,
    warn_on_unmapped: bool,
    exclude_none: bool,
}

impl RouteConfig {
    /// Options with an empty map and every switch off
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the route's error map
    #[must_use]
    pub fn with_error_map(mut self, error_map: ErrorMap) -> Self {
        self.error_map = error_map;
        self
    }

    /// Escalate unmapped errors as configuration errors instead of
    /// re-surfacing the original
    #[must_use]
    pub fn with_warn_on_unmapped(mut self, warn_on_unmapped: bool) -> Self {
        self.warn_on_unmapped = warn_on_unmapped;
        self
    }

    /// Drop null-valued object fields from translated payloads
    #[must_use]
    pub fn with_exclude_none(mut self, exclude_none: bool) -> Self {
        self.exclude_none = exclude_none;
        self
    }
}

/// One declared error response, for documentation consumers
#[derive(Debug, Clone)]
pub struct RouteErrorDoc {
    /// HTTP method of the declaring route
    pub method: Method,
    /// Path of the declaring route
    pub path: String,
    /// Status code exactly as declared, even if outside the error ranges
    pub status: u16,
    /// Payload shape of the translator serving this entry
    pub schema: Schema,
}

/// Router wrapper that attaches an error map to every registered route
///
/// Each registration wraps the endpoint in [`ErrorMapped`], records the
/// declared error responses for documentation, and hands the route to the
/// underlying [`Router`]. The defaults are fixed at construction and
/// shared by every route.
#[derive(Default)]
pub struct ErrorAwareRouter {
    router: Router,
    defaults: Defaults,
    docs: Vec<RouteErrorDoc>,
}

impl ErrorAwareRouter {
    /// Empty router with the built-in defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shared defaults
    #[must_use]
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Register a GET route wrapped with `config`'s error map
    #[must_use]
    pub fn get<R, E>(
        self,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.register(MethodFilter::GET, &Method::GET, path, endpoint, config)
    }

    /// Register a POST route wrapped with `config`'s error map
    #[must_use]
    pub fn post<R, E>(
        self,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.register(MethodFilter::POST, &Method::POST, path, endpoint, config)
    }

    /// Register a PUT route wrapped with `config`'s error map
    #[must_use]
    pub fn put<R, E>(
        self,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.register(MethodFilter::PUT, &Method::PUT, path, endpoint, config)
    }

    /// Register a PATCH route wrapped with `config`'s error map
    #[must_use]
    pub fn patch<R, E>(
        self,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.register(MethodFilter::PATCH, &Method::PATCH, path, endpoint, config)
    }

    /// Register a DELETE route wrapped with `config`'s error map
    #[must_use]
    pub fn delete<R, E>(
        self,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.register(MethodFilter::DELETE, &Method::DELETE, path, endpoint, config)
    }

    /// Declared error responses across every registered route
    #[must_use]
    pub fn error_docs(&self) -> &[RouteErrorDoc] {
        &self.docs
    }

    /// Hand over the underlying router for serving
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    fn register<R, E>(
        mut self,
        filter: MethodFilter,
        method: &Method,
        path: &str,
        endpoint: Work<Request, Result<R, E>>,
        config: RouteConfig,
    ) -> Self
    where
        R: IntoResponse + Send + 'static,
        E: MappedError,
    {
        self.record_docs(method, path, &config.error_map);

        let exclude_none = config.exclude_none;
        let mapped = Arc::new(ErrorMapped::new(
            endpoint,
            config.error_map,
            config.warn_on_unmapped,
            self.defaults.clone(),
        ));
        let handler = move |request: Request| {
            let mapped = Arc::clone(&mapped);
            async move { encode(mapped.run(request).await, exclude_none) }
        };

        self.router = self.router.route(path, on(filter, handler));
        self
    }

    fn record_docs(&mut self, method: &Method, path: &str, error_map: &ErrorMap) {
        for (_, entry) in error_map {
            let (status, translator) = match entry {
                MapEntry::Status(status) => (*status, None),
                MapEntry::Rule(rule) => (rule.status(), rule.translator()),
            };
            let schema = match translator {
                Some(translator) => translator.payload_schema(),
                None => pick_translator_for_status(
                    status,
                    &self.defaults.client_error_translator,
                    &self.defaults.server_error_translator,
                )
                .payload_schema(),
            };
            self.docs.push(RouteErrorDoc {
                method: method.clone(),
                path: path.to_owned(),
                status,
                schema,
            });
        }
    }
}

fn encode<R: IntoResponse>(
    outcome: Result<Outcome<R>, HandlingError>,
    exclude_none: bool,
) -> Response {
    match outcome {
        Ok(Outcome::Success(value)) => value.into_response(),
        Ok(Outcome::Error(error)) => {
            let payload = if exclude_none {
                strip_nulls(error.payload)
            } else {
                error.payload
            };
            (error.status, Json(payload)).into_response()
        }
        Err(escalation) => {
            tracing::error!(error = %escalation, "request failed outside the error map");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, field)| !field.is_null())
                .map(|(key, field)| (key, strip_nulls(field)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}
