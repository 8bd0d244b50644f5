//! Pure status policy: error-class predicates, validation, and the
//! default-translator pick

use std::sync::Arc;

use http::StatusCode;
use thiserror::Error;

use crate::translator::Translator;

/// Status code declared outside the accepted error ranges
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unsupported status for error map: {0}, use 4xx or 5xx")]
pub struct UnsupportedStatus(pub u16);

/// Returns true for 4xx statuses
#[must_use]
pub const fn is_client_error(status: u16) -> bool {
    status / 100 == 4
}

/// Returns true for 5xx statuses
#[must_use]
pub const fn is_server_error(status: u16) -> bool {
    status / 100 == 5
}

/// Validate a declared rule status
///
/// # Errors
///
/// Returns [`UnsupportedStatus`] unless `status` is in the 4xx or 5xx
/// range.
pub fn validate_error_status(status: u16) -> Result<StatusCode, UnsupportedStatus> {
    if !is_client_error(status) && !is_server_error(status) {
        return Err(UnsupportedStatus(status));
    }
    StatusCode::from_u16(status).map_err(|_| UnsupportedStatus(status))
}

/// Pick the default translator for a status: the server default for 5xx,
/// the client default otherwise
#[must_use]
pub fn pick_translator_for_status(
    status: u16,
    client: &Arc<dyn Translator>,
    server: &Arc<dyn Translator>,
) -> Arc<dyn Translator> {
    if is_server_error(status) {
        Arc::clone(server)
    } else {
        Arc::clone(client)
    }
}
