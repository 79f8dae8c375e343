use std::fmt::{Display, Formatter};

use fxboard_core::{EnvelopeMeta, UtcDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request identifier (UUID v4) for end-to-end request tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Command metadata used to construct envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub relay_chain: Vec<String>,
    pub latency_ms: u64,
    pub generated_at: Option<UtcDateTime>,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(relay_chain: Vec<String>, latency_ms: u64) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            relay_chain,
            latency_ms,
            generated_at: None,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> EnvelopeMeta {
        let meta = EnvelopeMeta::new(
            self.request_id.to_string(),
            self.relay_chain,
            self.latency_ms,
        )
        .with_warnings(self.warnings);

        match self.generated_at {
            Some(generated_at) => meta.with_generated_at(generated_at),
            None => meta,
        }
    }
}
