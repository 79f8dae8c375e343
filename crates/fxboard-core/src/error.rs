use thiserror::Error;

/// Failure of one fetch-and-normalize invocation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("API credential is missing; set FXBOARD_GEMINI_API_KEY, GEMINI_API_KEY or API_KEY")]
    MissingCredential,

    #[error("unable to reach the rate page through any relay (tried: {}); last error: {last_error}", attempted.join(", "))]
    AllProxiesFailed {
        last_error: String,
        attempted: Vec<String>,
    },

    #[error("AI completion returned no text")]
    EmptyResponse,

    #[error("AI completion could not be parsed into rate records: {reason}")]
    MalformedResult { reason: String },

    #[error("AI completion request failed: {message}")]
    CompletionFailed { message: String },

    #[error("rate refresh was cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResult {
            reason: reason.into(),
        }
    }

    pub fn completion_failed(message: impl Into<String>) -> Self {
        Self::CompletionFailed {
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in output envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "credential.missing",
            Self::AllProxiesFailed { .. } => "relay.all_failed",
            Self::EmptyResponse => "completion.empty",
            Self::MalformedResult { .. } => "completion.malformed",
            Self::CompletionFailed { .. } => "completion.failed",
            Self::Cancelled => "pipeline.cancelled",
        }
    }

    /// Whether a fresh user-triggered invocation may reasonably succeed.
    pub const fn retryable(&self) -> bool {
        !matches!(self, Self::MissingCredential | Self::Cancelled)
    }

    /// Relay names attempted before the failure, in order. Empty unless every relay failed.
    pub fn attempted_relays(&self) -> &[String] {
        match self {
            Self::AllProxiesFailed { attempted, .. } => attempted.as_slice(),
            _ => &[],
        }
    }
}
