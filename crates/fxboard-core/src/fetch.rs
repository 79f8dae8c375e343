use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::relay::{default_relays, ContentShape, RelayStrategy};

/// Substrings of which at least one must appear in a genuine rate page.
///
/// Relays happily answer `200 OK` with their own error pages.
pub const CONTENT_MARKERS: &[&str] = &["Currency", "USD", "美金", "Download CSV"];

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// One failed relay attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayFailure {
    pub relay: String,
    pub reason: String,
}

/// Page text obtained through the first relay that passed the sanity check.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub text: String,
    pub relay: &'static str,
    pub shape: ContentShape,
    /// Relays that failed before this one, in attempt order.
    pub failures: Vec<RelayFailure>,
    pub latency_ms: u64,
}

/// Sequential relay fallback chain.
pub struct RelayChain {
    relays: Vec<RelayStrategy>,
    http_client: Arc<dyn HttpClient>,
    attempt_timeout: Duration,
}

impl Default for RelayChain {
    fn default() -> Self {
        Self::new(
            default_relays(),
            Arc::new(ReqwestHttpClient::new()),
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }
}

impl RelayChain {
    pub fn new(
        relays: Vec<RelayStrategy>,
        http_client: Arc<dyn HttpClient>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            relays,
            http_client,
            attempt_timeout,
        }
    }

    pub fn relays(&self) -> &[RelayStrategy] {
        self.relays.as_slice()
    }

    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Tries every relay in order and returns the first page that looks like a rate table.
    ///
    /// Relays are never tried concurrently. Cancelling `cancel` aborts the
    /// in-flight request and returns [`PipelineError::Cancelled`].
    pub async fn fetch(
        &self,
        target_url: &str,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, PipelineError> {
        let started = Instant::now();
        let mut failures: Vec<RelayFailure> = Vec::with_capacity(self.relays.len());

        for relay in &self.relays {
            debug!(relay = relay.name, "attempting relay fetch");

            match self.attempt(relay, target_url, cancel).await {
                Ok(text) => {
                    info!(
                        relay = relay.name,
                        failed_attempts = failures.len(),
                        bytes = text.len(),
                        "fetched rate page"
                    );
                    return Ok(FetchedPage {
                        text,
                        relay: relay.name,
                        shape: relay.shape,
                        failures,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(AttemptError::Cancelled) => return Err(PipelineError::Cancelled),
                Err(AttemptError::Failed(error)) => {
                    warn!(relay = relay.name, error = %error, "relay fetch failed");
                    failures.push(RelayFailure {
                        relay: relay.name.to_owned(),
                        reason: error.message().to_owned(),
                    });
                }
            }
        }

        let last_error = failures
            .last()
            .map(|failure| failure.reason.clone())
            .unwrap_or_else(|| String::from("no relays are configured"));

        Err(PipelineError::AllProxiesFailed {
            last_error,
            attempted: failures.into_iter().map(|failure| failure.relay).collect(),
        })
    }

    async fn attempt(
        &self,
        relay: &RelayStrategy,
        target_url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, AttemptError> {
        let timeout_ms = duration_ms(self.attempt_timeout);
        let request = HttpRequest::get(relay.relay_url(target_url))
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_timeout_ms(timeout_ms);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AttemptError::Cancelled),
            _ = tokio::time::sleep(self.attempt_timeout) => {
                return Err(AttemptError::Failed(HttpError::timeout(timeout_ms)));
            }
            result = self.http_client.execute(request) => result.map_err(AttemptError::Failed)?,
        };

        if !response.is_success() {
            return Err(AttemptError::Failed(HttpError::status(response.status)));
        }

        let text = relay.extract_text(response).map_err(AttemptError::Failed)?;
        if !looks_like_rate_page(&text) {
            return Err(AttemptError::Failed(HttpError::content(
                "fetched content does not contain currency rate data",
            )));
        }

        Ok(text)
    }
}

enum AttemptError {
    Cancelled,
    Failed(HttpError),
}

/// Content sanity check applied to every relay response.
pub fn looks_like_rate_page(text: &str) -> bool {
    CONTENT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    duration_ms(started.elapsed())
}
