//! # FxBoard Core
//!
//! Foreign-exchange rate acquisition for the Bank of Taiwan board page.
//!
//! ## Overview
//!
//! The bank page cannot be fetched reliably from a single origin, and its
//! markup is not a stable contract. This crate:
//!
//! - **Fetches** the page through an ordered chain of public relays
//! - **Localizes** the rate table inside raw HTML
//! - **Extracts** rows with a generative model (Gemini) and coerces the reply
//! - **Normalizes** each row into ordered buy/sell pairs with mid rates
//! - **Presents** results through a [`RateBoard`] view model
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`board`] | Refreshable view model, display order, number formatting |
//! | [`config`] | Defaults, environment variables, validated overrides |
//! | [`domain`] | Rate records, quote pairs, currency table, UTC timestamps |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Pipeline error taxonomy |
//! | [`extract`] | Prompt construction, completion service, reply parsing |
//! | [`fetch`] | Relay chain with per-attempt timeout and content check |
//! | [`http_client`] | HTTP client abstraction |
//! | [`localize`] | Table localization in raw HTML |
//! | [`normalize`] | Pair repair and mid-rate derivation |
//! | [`pipeline`] | End-to-end refresh |
//! | [`relay`] | Relay strategy catalog |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fxboard_core::{PipelineConfig, RatePipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::from_env()?;
//!     let pipeline = RatePipeline::builder(config).build();
//!
//!     let snapshot = pipeline.run(&CancellationToken::new()).await?;
//!     for rate in &snapshot.rates {
//!         println!("{} {:?}", rate.currency(), rate.cash_mid);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  RatePipeline   │────▶│ RelayChain       │──▶ HTTP Client
//! └────────┬────────┘     └──────────────────┘
//!          │ page text
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ localize        │────▶│ Extractor        │──▶ CompletionService
//! └─────────────────┘     └────────┬─────────┘
//!                                  │ RateRecord[]
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ normalize        │──▶ CalculatedRate[]
//!                         └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key is read from environment variables and never logged
//! - The key travels in a request header, never in the URL

pub mod board;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http_client;
pub mod localize;
pub mod normalize;
pub mod pipeline;
pub mod relay;

// Board
pub use board::{format_rate, sorted_for_display, RateBoard};

// Configuration
pub use config::{ConfigError, PipelineConfig, DEFAULT_TARGET_URL};

// Domain models
pub use domain::{CalculatedRate, QuotePair, RateRecord, UtcDateTime};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::PipelineError;

// Extraction
pub use extract::{
    CompletionFuture, CompletionService, Extraction, Extractor, GeminiClient, GenerationConfig,
};

// Fetching
pub use fetch::{duration_ms, FetchedPage, RelayChain, RelayFailure};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpFuture, HttpMethod, HttpRequest,
    HttpResponse, ReqwestHttpClient,
};

// Pipeline
pub use pipeline::{FetchOutcome, RatePipeline, RatePipelineBuilder, RateSnapshot};

// Relays
pub use relay::{default_relays, ContentShape, RelayStrategy};
