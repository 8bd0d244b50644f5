//! Translator contract and the built-in default translators

use schemars::{JsonSchema, Schema, schema_for};
use serde::Serialize;
use serde_json::Value;

use crate::error::MappedError;

/// Converts a raised error into a structured response payload
///
/// `from_error` must succeed for every error type the translator is
/// registered against. The payload is a plain JSON value handed to the
/// encoding layer, never a pre-serialized string.
pub trait Translator: Send + Sync {
    /// Build the response payload for `error`
    fn from_error(&self, error: &dyn MappedError) -> Value;

    /// Shape of the payloads this translator produces, for documentation
    /// consumers
    fn payload_schema(&self) -> Schema;
}

/// Payload shape shared by the built-in translators
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorPayload {
    /// Human-readable error message
    pub error: String,
}

/// Default client-error translator
///
/// Echoes the error's display text as `{"error": "<message>"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleErrorTranslator;

impl Translator for SimpleErrorTranslator {
    fn from_error(&self, error: &dyn MappedError) -> Value {
        serde_json::json!({ "error": error.to_string() })
    }

    fn payload_schema(&self) -> Schema {
        schema_for!(ErrorPayload)
    }
}

/// Default server-error translator
///
/// Always emits `{"error": "Internal Server Error"}`, keeping failure
/// detail out of responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskedErrorTranslator;

impl Translator for MaskedErrorTranslator {
    fn from_error(&self, _error: &dyn MappedError) -> Value {
        serde_json::json!({ "error": "Internal Server Error" })
    }

    fn payload_schema(&self) -> Schema {
        schema_for!(ErrorPayload)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use thiserror::Error;

    use crate::tag::ErrorTag;

    use super::*;

    #[derive(Debug, Error)]
    #[error("payment rejected")]
    struct PaymentError;

    impl MappedError for PaymentError {
        fn tag(&self) -> ErrorTag {
            ErrorTag::of::<Self>()
        }
    }

    #[test]
    fn simple_translator_echoes_the_message() {
        let payload = SimpleErrorTranslator.from_error(&PaymentError);
        assert_eq!(payload, json!({"error": "payment rejected"}));
    }

    #[test]
    fn masked_translator_hides_the_message() {
        let payload = MaskedErrorTranslator.from_error(&PaymentError);
        assert_eq!(payload, json!({"error": "Internal Server Error"}));
    }

    #[test]
    fn payload_schema_describes_the_error_field() {
        let schema = serde_json::to_value(SimpleErrorTranslator.payload_schema()).unwrap();
        assert!(schema["properties"]["error"].is_object());
    }
}
