//! Declarative error-to-response mapping for axum routes
//!
//! Route handlers declare a per-route map from error types to response
//! rules. When a handler fails, the raised error's ancestry is walked
//! most-specific-first to pick the one applicable rule, an optional
//! side-effect callback runs, and a translator turns the error into a
//! JSON payload with the declared status. Blocking handlers and callbacks
//! are dispatched to the blocking pool instead of stalling the event
//! loop.

pub mod handling;
pub mod resolve;
#[cfg(feature = "http")]
pub mod router;
pub mod rules;
pub mod work;

pub use handling::{ErrorMapped, ErrorResponse, HandlingError, Outcome};
pub use resolve::{ResolveError, ResolvedRule, resolve_rule_for_error};
#[cfg(feature = "http")]
pub use router::{ErrorAwareRouter, RouteConfig, RouteErrorDoc};
pub use rules::{Defaults, ErrorMap, MapEntry, Rule};
pub use work::{OnError, Work};
