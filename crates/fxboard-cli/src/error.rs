use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] fxboard_core::ConfigError),

    #[error("no API key configured; set FXBOARD_GEMINI_API_KEY, GEMINI_API_KEY or API_KEY")]
    MissingCredential,

    #[error("interrupted")]
    Cancelled,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::MissingCredential => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Cancelled => 130,
        }
    }
}
