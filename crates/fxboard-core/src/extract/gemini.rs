use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::PipelineError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const JSON_MIME_TYPE: &str = "application/json";

/// Model and decoding settings for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: String::from(DEFAULT_MODEL),
            temperature: DEFAULT_TEMPERATURE,
            response_mime_type: String::from(JSON_MIME_TYPE),
        }
    }
}

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, PipelineError>> + Send + 'a>>;

/// Generative text-completion backend.
///
/// `Ok(None)` means the service answered but produced no text.
pub trait CompletionService: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str, config: &'a GenerationConfig)
        -> CompletionFuture<'a>;
}

/// Gemini `generateContent` over the crate's HTTP transport.
pub struct GeminiClient {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl GeminiClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::Header {
                name: String::from("x-goog-api-key"),
                value: api_key.into(),
            },
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 60_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

impl CompletionService for GeminiClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        config: &'a GenerationConfig,
    ) -> CompletionFuture<'a> {
        Box::pin(async move {
            let body = json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "temperature": config.temperature,
                    "responseMimeType": config.response_mime_type,
                },
            });

            let request = HttpRequest::post(self.endpoint(&config.model))
                .with_header("content-type", "application/json")
                .with_auth(&self.auth)
                .with_body(body.to_string())
                .with_timeout_ms(self.timeout_ms);

            debug!(model = %config.model, prompt_chars = prompt.len(), "calling completion service");

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| PipelineError::completion_failed(error.message()))?;

            if !response.is_success() {
                return Err(PipelineError::completion_failed(format!(
                    "status {}: {}",
                    response.status,
                    api_error_message(&response.body)
                )));
            }

            let parsed: GenerateContentResponse = serde_json::from_str(&response.body)
                .map_err(|error| {
                    PipelineError::completion_failed(format!("unreadable response: {error}"))
                })?;

            Ok(parsed.text())
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}
