use serde::Serialize;

use crate::{PipelineError, UtcDateTime};

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for all `fxboard` machine-readable outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self::with_errors(meta, data, Vec::new())
    }

    pub fn with_errors(meta: EnvelopeMeta, data: T, errors: Vec<EnvelopeError>) -> Self {
        Self { meta, data, errors }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    /// Relays tried in order; the last entry served the page on success.
    pub relay_chain: Vec<String>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(request_id: impl Into<String>, relay_chain: Vec<String>, latency_ms: u64) -> Self {
        Self {
            request_id: request_id.into(),
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: UtcDateTime::now(),
            relay_chain,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn with_generated_at(mut self, generated_at: UtcDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Structured error payload for failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempted: Vec<String>,
}

impl From<&PipelineError> for EnvelopeError {
    fn from(error: &PipelineError) -> Self {
        Self {
            code: String::from(error.code()),
            message: error.to_string(),
            retryable: error.retryable(),
            attempted: error.attempted_relays().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_carries_schema_version_and_chain() {
        let meta = EnvelopeMeta::new("request-12345", vec![String::from("CodeTabs")], 11);

        assert_eq!(meta.schema_version, "v1.0.0");
        assert_eq!(meta.relay_chain, vec!["CodeTabs"]);
        assert!(meta.warnings.is_empty());
    }

    #[test]
    fn pipeline_error_maps_code_and_attempts() {
        let error = PipelineError::AllProxiesFailed {
            last_error: String::from("HTTP error status: 503"),
            attempted: vec![String::from("Jina AI Reader"), String::from("CodeTabs")],
        };

        let envelope_error = EnvelopeError::from(&error);

        assert_eq!(envelope_error.code, "relay.all_failed");
        assert!(envelope_error.retryable);
        assert_eq!(envelope_error.attempted.len(), 2);
        assert!(envelope_error.message.contains("HTTP error status: 503"));
    }

    #[test]
    fn missing_credential_is_not_retryable() {
        let envelope_error = EnvelopeError::from(&PipelineError::MissingCredential);

        assert_eq!(envelope_error.code, "credential.missing");
        assert!(!envelope_error.retryable);
        assert!(envelope_error.attempted.is_empty());
    }

    #[test]
    fn serializes_meta_with_relay_chain() {
        let meta = EnvelopeMeta::new("request-12345", vec![String::from("AllOrigins")], 7)
            .with_warnings(vec![String::from("discarded 1 row(s) without a currency code")]);
        let envelope = Envelope::success(meta, serde_json::json!([]));

        let value = serde_json::to_value(&envelope).expect("serializable");

        assert_eq!(value["meta"]["relay_chain"][0], "AllOrigins");
        assert_eq!(value["meta"]["warnings"].as_array().map(Vec::len), Some(1));
        assert!(value.get("errors").is_none());
    }
}
