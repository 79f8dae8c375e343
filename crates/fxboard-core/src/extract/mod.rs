//! AI-assisted extraction of rate rows from localized page text.

pub mod gemini;
pub mod parse;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::RateRecord;
use crate::error::PipelineError;

pub use gemini::{CompletionFuture, CompletionService, GeminiClient, GenerationConfig};

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Coerced rows plus how many were discarded for lacking a currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub records: Vec<RateRecord>,
    pub dropped_rows: usize,
}

pub struct Extractor {
    service: Arc<dyn CompletionService>,
    generation: GenerationConfig,
    excerpt_cap: usize,
    timeout: Duration,
}

impl Extractor {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            generation: GenerationConfig::default(),
            excerpt_cap: prompt::DEFAULT_EXCERPT_CAP,
            timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_excerpt_cap(mut self, excerpt_cap: usize) -> Self {
        self.excerpt_cap = excerpt_cap;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `text` to the completion service and parses the reply into records.
    pub async fn extract(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Extraction, PipelineError> {
        let prompt = prompt::build_prompt(text, self.excerpt_cap);

        let completion = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            _ = tokio::time::sleep(self.timeout) => {
                return Err(PipelineError::completion_failed(format!(
                    "timed out after {} ms",
                    self.timeout.as_millis()
                )));
            }
            result = self.service.complete(&prompt, &self.generation) => result?,
        };

        let raw = completion
            .filter(|text| !text.trim().is_empty())
            .ok_or(PipelineError::EmptyResponse)?;

        let coerced = parse::parse_records(&raw)?;
        let total = coerced.len();
        let records = coerced
            .into_iter()
            .filter(|record| !record.currency.trim().is_empty())
            .collect::<Vec<_>>();
        let dropped_rows = total - records.len();

        if dropped_rows > 0 {
            warn!(dropped_rows, "discarded rows without a currency code");
        }

        debug!(rows = records.len(), "extracted rate rows");
        Ok(Extraction {
            records,
            dropped_rows,
        })
    }
}
