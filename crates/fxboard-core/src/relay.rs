//! Ordered catalog of public CORS relays.
//!
//! Each relay is a plain descriptor: how to rewrite the target URL and how to
//! turn the relay's response into page text. Preference order is the order of
//! [`default_relays`]; reorder or append there, the chain logic never changes.

use serde::Serialize;

use crate::http_client::{HttpError, HttpResponse};

/// What a relay hands back for the target page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentShape {
    /// The origin's HTML, passed through untouched.
    RawHtml,
    /// Reader-style text (prose/markdown) already reduced to the readable content.
    Condensed,
}

impl ContentShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RawHtml => "raw_html",
            Self::Condensed => "condensed",
        }
    }
}

pub type BuildUrl = fn(&str) -> String;
pub type ExtractText = fn(HttpResponse) -> Result<String, HttpError>;

/// One relay endpoint: URL rewriting rule plus response-to-text rule.
#[derive(Clone, Copy)]
pub struct RelayStrategy {
    pub name: &'static str,
    pub shape: ContentShape,
    build_url: BuildUrl,
    extract: ExtractText,
}

impl RelayStrategy {
    pub const fn new(
        name: &'static str,
        shape: ContentShape,
        build_url: BuildUrl,
        extract: ExtractText,
    ) -> Self {
        Self {
            name,
            shape,
            build_url,
            extract,
        }
    }

    pub fn relay_url(&self, target_url: &str) -> String {
        (self.build_url)(target_url)
    }

    pub fn extract_text(&self, response: HttpResponse) -> Result<String, HttpError> {
        (self.extract)(response)
    }
}

impl std::fmt::Debug for RelayStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayStrategy")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Relays in preference order, fastest/most reliable first.
pub fn default_relays() -> Vec<RelayStrategy> {
    vec![
        RelayStrategy::new(
            "Jina AI Reader",
            ContentShape::Condensed,
            |url| format!("https://r.jina.ai/{url}"),
            body_text,
        ),
        RelayStrategy::new(
            "CodeTabs",
            ContentShape::RawHtml,
            |url| {
                format!(
                    "https://api.codetabs.com/v1/proxy?quest={}",
                    urlencoding::encode(url)
                )
            },
            body_text,
        ),
        RelayStrategy::new(
            "ThingProxy",
            ContentShape::RawHtml,
            |url| format!("https://thingproxy.freeboard.io/fetch/{url}"),
            body_text,
        ),
        RelayStrategy::new(
            "AllOrigins",
            ContentShape::RawHtml,
            |url| {
                format!(
                    "https://api.allorigins.win/raw?url={}",
                    urlencoding::encode(url)
                )
            },
            body_text,
        ),
    ]
}

/// Response body as-is.
pub fn body_text(response: HttpResponse) -> Result<String, HttpError> {
    Ok(response.body)
}
