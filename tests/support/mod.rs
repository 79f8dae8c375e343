//! Deterministic offline doubles shared by the behavior suites.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use fxboard_core::relay::body_text;
use fxboard_core::{
    CompletionFuture, CompletionService, ContentShape, GenerationConfig, HttpClient, HttpError,
    HttpErrorKind, HttpFuture, HttpRequest, HttpResponse, PipelineError, RelayStrategy,
};

pub const TARGET_URL: &str = "https://rate.bot.com.tw/xrt?Lang=en-US";

/// Raw bank page with navigation noise ahead of the titled rate table.
pub const RATE_PAGE_HTML: &str = concat!(
    "<html><head><title>Bank</title></head><body>",
    "<div id=\"SITE-NAVIGATION\"><table class=\"menu\"><tr><td>Home</td></tr></table></div>",
    "<table title=\"牌告匯率\"><thead><tr><th>Currency</th><th>Cash Buying</th></tr></thead>",
    "<tbody><tr><td>美金 (USD)</td><td>32.1</td><td>32.6</td><td>32.4</td><td>32.5</td></tr>",
    "<tr><td>日圓 (JPY)</td><td>0.2034</td><td>0.2162</td><td>0.2105</td><td>0.2155</td></tr>",
    "</tbody></table></body></html>"
);

/// Condensed markdown as served by a reader relay.
pub const RATE_PAGE_MARKDOWN: &str = "SITE-NAVIGATION\n\n| Currency | Cash Buying | Cash Selling |\n|---|---|---|\n| USD | 32.1 | 32.6 |\n";

pub const BLOCKED_PAGE: &str = "<html><body>Access denied by upstream proxy</body></html>";

#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(HttpError),
    /// Sleeps before answering with the rate page, long enough to hit any test timeout.
    Stall(Duration),
}

impl Reply {
    pub fn html() -> Self {
        Self::Respond(HttpResponse::ok(RATE_PAGE_HTML))
    }

    pub fn status(status: u16) -> Self {
        Self::Respond(HttpResponse::with_status(status, "upstream error"))
    }

    pub fn body(body: impl Into<String>) -> Self {
        Self::Respond(HttpResponse::ok(body))
    }
}

/// In-memory transport answering by URL prefix and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(String, Reply)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url_prefix: impl Into<String>, reply: Reply) -> Self {
        self.routes.push((url_prefix.into(), reply));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.url)
            .collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let reply = self
                .routes
                .iter()
                .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
                .map(|(_, reply)| reply.clone());
            let url = request.url.clone();
            self.requests
                .lock()
                .expect("request log lock")
                .push(request);

            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(error)) => Err(error),
                Some(Reply::Stall(delay)) => {
                    tokio::time::sleep(delay).await;
                    Ok(HttpResponse::ok(RATE_PAGE_HTML))
                }
                None => Err(HttpError::new(
                    HttpErrorKind::Connect,
                    format!("no scripted route for {url}"),
                )),
            }
        })
    }
}

/// Four raw-HTML relays on distinct fake hosts.
pub fn test_relays() -> Vec<RelayStrategy> {
    vec![
        RelayStrategy::new(
            "alpha",
            ContentShape::RawHtml,
            |url| format!("https://alpha.test/{url}"),
            body_text,
        ),
        RelayStrategy::new(
            "bravo",
            ContentShape::RawHtml,
            |url| format!("https://bravo.test/?u={}", urlencode(url)),
            body_text,
        ),
        RelayStrategy::new(
            "charlie",
            ContentShape::RawHtml,
            |url| format!("https://charlie.test/{url}"),
            body_text,
        ),
        RelayStrategy::new(
            "delta",
            ContentShape::RawHtml,
            |url| format!("https://delta.test/{url}"),
            body_text,
        ),
    ]
}

/// A single condensed relay, like a reader service.
pub fn reader_relay() -> RelayStrategy {
    RelayStrategy::new(
        "reader",
        ContentShape::Condensed,
        |url| format!("https://reader.test/{url}"),
        body_text,
    )
}

fn urlencode(url: &str) -> String {
    url.replace(':', "%3A").replace('/', "%2F").replace('?', "%3F")
}

/// Completion double returning a fixed reply, optionally after a delay.
pub struct ScriptedCompletion {
    reply: Result<Option<String>, PipelineError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn text(reply: impl Into<String>) -> Self {
        Self::with_reply(Ok(Some(reply.into())))
    }

    pub fn with_reply(reply: Result<Option<String>, PipelineError>) -> Self {
        Self {
            reply,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log lock").clone()
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        _config: &'a GenerationConfig,
    ) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.prompts
                .lock()
                .expect("prompt log lock")
                .push(prompt.to_owned());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone()
        })
    }
}

/// Gemini `generateContent` response body wrapping `text`.
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}
