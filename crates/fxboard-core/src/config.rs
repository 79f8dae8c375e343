//! Pipeline configuration.
//!
//! Values come from defaults, then environment variables, then explicit
//! overrides (the CLI's global flags).
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var(s) |
//! |---------|-----------------|---------------------|
//! | API key | `FXBOARD_GEMINI_API_KEY` | `GEMINI_API_KEY`, `API_KEY` |
//! | Target page | `FXBOARD_TARGET_URL` | - |
//! | Per-relay timeout | `FXBOARD_ATTEMPT_TIMEOUT_MS` | - |
//! | Model | `FXBOARD_MODEL` | - |

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::extract::gemini::{GenerationConfig, DEFAULT_BASE_URL};
use crate::extract::prompt::DEFAULT_EXCERPT_CAP;
use crate::extract::DEFAULT_COMPLETION_TIMEOUT;
use crate::fetch::DEFAULT_ATTEMPT_TIMEOUT;

pub const DEFAULT_TARGET_URL: &str = "https://rate.bot.com.tw/xrt?Lang=en-US";
pub const MIN_ATTEMPT_TIMEOUT_MS: u64 = 1_000;
pub const MAX_ATTEMPT_TIMEOUT_MS: u64 = 60_000;

const API_KEY_VARS: &[&str] = &["FXBOARD_GEMINI_API_KEY", "GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be an integer number of milliseconds: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("attempt timeout {value_ms} ms is outside {min_ms}..={max_ms} ms")]
    TimeoutOutOfRange {
        value_ms: u64,
        min_ms: u64,
        max_ms: u64,
    },
    #[error("target URL must start with http:// or https://: '{value}'")]
    InvalidTargetUrl { value: String },
    #[error("model name cannot be empty")]
    EmptyModel,
}

#[derive(Clone, PartialEq)]
pub struct PipelineConfig {
    pub target_url: String,
    pub api_key: Option<String>,
    pub attempt_timeout: Duration,
    pub completion_timeout: Duration,
    pub gemini_base_url: String,
    pub generation: GenerationConfig,
    pub excerpt_cap: usize,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("target_url", &self.target_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("attempt_timeout", &self.attempt_timeout)
            .field("completion_timeout", &self.completion_timeout)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("generation", &self.generation)
            .field("excerpt_cap", &self.excerpt_cap)
            .finish()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_url: String::from(DEFAULT_TARGET_URL),
            api_key: None,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            gemini_base_url: String::from(DEFAULT_BASE_URL),
            generation: GenerationConfig::default(),
            excerpt_cap: DEFAULT_EXCERPT_CAP,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.api_key = API_KEY_VARS.iter().find_map(|name| read(*name));

        if let Some(url) = read("FXBOARD_TARGET_URL") {
            config = config.with_target_url(url)?;
        }

        if let Some(raw) = read("FXBOARD_ATTEMPT_TIMEOUT_MS") {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "FXBOARD_ATTEMPT_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
            config = config.with_attempt_timeout_ms(timeout_ms)?;
        }

        if let Some(model) = read("FXBOARD_MODEL") {
            config = config.with_model(model)?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidTargetUrl { value: url });
        }
        self.target_url = url;
        Ok(self)
    }

    pub fn with_attempt_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ConfigError> {
        if !(MIN_ATTEMPT_TIMEOUT_MS..=MAX_ATTEMPT_TIMEOUT_MS).contains(&timeout_ms) {
            return Err(ConfigError::TimeoutOutOfRange {
                value_ms: timeout_ms,
                min_ms: MIN_ATTEMPT_TIMEOUT_MS,
                max_ms: MAX_ATTEMPT_TIMEOUT_MS,
            });
        }
        self.attempt_timeout = Duration::from_millis(timeout_ms);
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self, ConfigError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        self.generation.model = model.trim().to_owned();
        Ok(self)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_bank_page_and_gemini() {
        let config = PipelineConfig::from_lookup(lookup(&[])).expect("valid");

        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert_eq!(config.attempt_timeout, Duration::from_secs(10));
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.excerpt_cap, 150_000);
        assert!(!config.has_credential());
    }

    #[test]
    fn prefixed_key_wins_over_fallbacks() {
        let config = PipelineConfig::from_lookup(lookup(&[
            ("API_KEY", "generic"),
            ("GEMINI_API_KEY", "gemini"),
            ("FXBOARD_GEMINI_API_KEY", "fxboard"),
        ]))
        .expect("valid");
        assert_eq!(config.api_key.as_deref(), Some("fxboard"));

        let config = PipelineConfig::from_lookup(lookup(&[
            ("FXBOARD_GEMINI_API_KEY", "  "),
            ("API_KEY", "generic"),
        ]))
        .expect("valid");
        assert_eq!(config.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn timeout_must_be_numeric_and_in_range() {
        let err = PipelineConfig::from_lookup(lookup(&[("FXBOARD_ATTEMPT_TIMEOUT_MS", "soon")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = PipelineConfig::from_lookup(lookup(&[("FXBOARD_ATTEMPT_TIMEOUT_MS", "500")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::TimeoutOutOfRange { value_ms: 500, .. }));

        let config =
            PipelineConfig::from_lookup(lookup(&[("FXBOARD_ATTEMPT_TIMEOUT_MS", "3500")]))
                .expect("valid");
        assert_eq!(config.attempt_timeout, Duration::from_millis(3_500));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = PipelineConfig::default().with_api_key("secret-123");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-123"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn rejects_non_http_target_and_blank_model() {
        assert!(matches!(
            PipelineConfig::default().with_target_url("ftp://rate.bot.com.tw"),
            Err(ConfigError::InvalidTargetUrl { .. })
        ));
        assert_eq!(
            PipelineConfig::default().with_model(" "),
            Err(ConfigError::EmptyModel)
        );
    }
}
