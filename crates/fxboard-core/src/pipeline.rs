use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::config::PipelineConfig;
use crate::domain::{CalculatedRate, UtcDateTime};
use crate::error::PipelineError;
use crate::extract::{CompletionService, Extractor, GeminiClient};
use crate::fetch::{duration_ms, elapsed_ms, RelayChain, RelayFailure};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::localize::localize_page;
use crate::normalize::normalize;
use crate::relay::{default_relays, RelayStrategy};

/// Display-ready result of one successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub rates: Vec<CalculatedRate>,
    pub relay: String,
    pub failures: Vec<RelayFailure>,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
}

impl RateSnapshot {
    /// Relays tried, in order, ending with the one that served the page.
    pub fn relay_chain(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|failure| failure.relay.clone())
            .chain(std::iter::once(self.relay.clone()))
            .collect()
    }
}

/// Outcome of one refresh, stamped with the time it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub completed_at: UtcDateTime,
    pub result: Result<RateSnapshot, PipelineError>,
}

impl FetchOutcome {
    pub fn new(result: Result<RateSnapshot, PipelineError>) -> Self {
        Self {
            completed_at: UtcDateTime::now(),
            result,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch → localize → extract → normalize, as one cancellable operation.
pub struct RatePipeline {
    target_url: String,
    chain: RelayChain,
    extractor: Option<Extractor>,
}

impl RatePipeline {
    pub fn builder(config: PipelineConfig) -> RatePipelineBuilder {
        RatePipelineBuilder::new(config)
    }

    pub fn target_url(&self) -> &str {
        self.target_url.as_str()
    }

    pub fn relays(&self) -> &[RelayStrategy] {
        self.chain.relays()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.chain.attempt_timeout()
    }

    pub const fn has_credential(&self) -> bool {
        self.extractor.is_some()
    }

    /// Runs the pipeline once.
    ///
    /// Fails with [`PipelineError::MissingCredential`] before any network
    /// call when no API key was configured.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RateSnapshot, PipelineError> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or(PipelineError::MissingCredential)?;
        let started = Instant::now();

        let page = self.chain.fetch(&self.target_url, cancel).await?;
        let text = localize_page(&page);
        let extraction = extractor.extract(text, cancel).await?;
        let rates = normalize(extraction.records);

        let mut warnings = Vec::new();
        if !page.failures.is_empty() {
            warnings.push(format!(
                "relay fallback succeeded with '{}' after {} failed attempt(s)",
                page.relay,
                page.failures.len()
            ));
        }
        if extraction.dropped_rows > 0 {
            warnings.push(format!(
                "discarded {} row(s) without a currency code",
                extraction.dropped_rows
            ));
        }

        let latency_ms = elapsed_ms(started);
        info!(rows = rates.len(), relay = page.relay, latency_ms, "rate refresh complete");

        Ok(RateSnapshot {
            rates,
            relay: page.relay.to_owned(),
            failures: page.failures,
            warnings,
            latency_ms,
        })
    }

    /// [`Self::run`] wrapped into a timestamped [`FetchOutcome`].
    pub async fn refresh(&self, cancel: &CancellationToken) -> FetchOutcome {
        let span = info_span!("refresh", target = %self.target_url);
        FetchOutcome::new(self.run(cancel).instrument(span).await)
    }
}

/// Assembles a [`RatePipeline`] from config plus optional transport overrides.
///
/// Without overrides the relays use [`default_relays`], the transport is
/// reqwest, and completions go to Gemini with the configured key.
pub struct RatePipelineBuilder {
    config: PipelineConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    relays: Option<Vec<RelayStrategy>>,
    completion: Option<Arc<dyn CompletionService>>,
}

impl RatePipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            http_client: None,
            relays: None,
            completion: None,
        }
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_relays(mut self, relays: Vec<RelayStrategy>) -> Self {
        self.relays = Some(relays);
        self
    }

    /// Replaces the Gemini client. A credential is still required.
    pub fn with_completion_service(mut self, completion: Arc<dyn CompletionService>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn build(self) -> RatePipeline {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let config = self.config;

        let extractor = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                let service = self.completion.unwrap_or_else(|| {
                    Arc::new(
                        GeminiClient::new(Arc::clone(&http_client), key)
                            .with_base_url(config.gemini_base_url.as_str())
                            .with_timeout_ms(duration_ms(config.completion_timeout)),
                    )
                });
                Extractor::new(service)
                    .with_generation(config.generation.clone())
                    .with_excerpt_cap(config.excerpt_cap)
                    .with_timeout(config.completion_timeout)
            });

        let chain = RelayChain::new(
            self.relays.unwrap_or_else(default_relays),
            http_client,
            config.attempt_timeout,
        );

        RatePipeline {
            target_url: config.target_url,
            chain,
            extractor,
        }
    }
}
