//! Behavior tests for the relay fallback chain.
//!
//! These verify attempt order, the content sanity check, per-attempt
//! timeouts and cancellation, using a scripted in-memory transport.

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use fxboard_core::{
    default_relays, ContentShape, HttpError, HttpErrorKind, HttpMethod, PipelineError,
    RelayChain,
};
use tokio_util::sync::CancellationToken;

use support::{test_relays, Reply, ScriptedHttpClient, RATE_PAGE_HTML, TARGET_URL};

const SHORT_TIMEOUT: Duration = Duration::from_millis(50);

fn chain(client: &Arc<ScriptedHttpClient>) -> RelayChain {
    RelayChain::new(test_relays(), client.clone(), SHORT_TIMEOUT)
}

#[tokio::test]
async fn when_first_relay_errors_next_relay_serves_the_page() {
    // Given: alpha answers 500 and bravo answers with the rate page
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://alpha.test/", Reply::status(500))
            .route("https://bravo.test/", Reply::html()),
    );

    // When: the chain fetches the target
    let page = chain(&client)
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect("second relay should succeed");

    // Then: bravo served the page and alpha is recorded as a failure
    assert_eq!(page.relay, "bravo");
    assert_eq!(page.text, RATE_PAGE_HTML);
    assert_eq!(page.shape, ContentShape::RawHtml);
    assert_eq!(page.failures.len(), 1);
    assert_eq!(page.failures[0].relay, "alpha");
    assert!(page.failures[0].reason.contains("500"));

    // And: relays after the winner were never contacted
    let urls = client.request_urls();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].starts_with("https://alpha.test/"));
    assert!(urls[1].starts_with("https://bravo.test/"));
}

#[tokio::test]
async fn when_relay_returns_ok_without_rate_data_it_is_skipped() {
    // Given: alpha answers 200 with a block page
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://alpha.test/", Reply::body(support::BLOCKED_PAGE))
            .route("https://bravo.test/", Reply::html()),
    );

    // When: the chain fetches
    let page = chain(&client)
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect("bravo should succeed");

    // Then: the block page failed the content check
    assert_eq!(page.relay, "bravo");
    assert!(page.failures[0]
        .reason
        .contains("does not contain currency rate data"));
}

#[tokio::test]
async fn when_every_relay_fails_all_attempts_are_reported_in_order() {
    // Given: every relay fails in a different way
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://alpha.test/", Reply::status(429))
            .route("https://bravo.test/", Reply::body(support::BLOCKED_PAGE))
            .route(
                "https://charlie.test/",
                Reply::Fail(HttpError::new(HttpErrorKind::Connect, "connection refused")),
            )
            .route("https://delta.test/", Reply::status(503)),
    );

    // When: the chain fetches
    let error = chain(&client)
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect_err("every relay failed");

    // Then: the error names each relay and carries the last reason
    match &error {
        PipelineError::AllProxiesFailed {
            last_error,
            attempted,
        } => {
            assert_eq!(attempted, &vec!["alpha", "bravo", "charlie", "delta"]);
            assert!(last_error.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(error.code(), "relay.all_failed");
    assert!(error.retryable());
    assert_eq!(client.requests().len(), 4);
}

#[tokio::test]
async fn when_relay_stalls_attempt_times_out_and_chain_moves_on() {
    // Given: alpha never answers within the attempt timeout
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://alpha.test/", Reply::Stall(Duration::from_secs(30)))
            .route("https://bravo.test/", Reply::html()),
    );
    let started = Instant::now();

    // When: the chain fetches
    let page = chain(&client)
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect("bravo should succeed");

    // Then: the stalled attempt was abandoned quickly
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(page.relay, "bravo");
    assert!(page.failures[0].reason.contains("timed out"));
}

#[tokio::test]
async fn when_cancelled_mid_attempt_no_further_relays_are_tried() {
    // Given: alpha stalls and the caller cancels shortly after the fetch begins
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://alpha.test/", Reply::Stall(Duration::from_secs(30)))
            .route("https://bravo.test/", Reply::html()),
    );
    let chain = RelayChain::new(test_relays(), client.clone(), Duration::from_secs(20));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.cancel();
    });

    // When: the chain fetches
    let error = chain
        .fetch(TARGET_URL, &cancel)
        .await
        .expect_err("fetch was cancelled");

    // Then: the fetch stops without moving to the next relay
    assert_eq!(error, PipelineError::Cancelled);
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn relay_requests_carry_ajax_header_and_encoded_target() {
    // Given: the production relay catalog over a recording transport
    let client = Arc::new(
        ScriptedHttpClient::new()
            .route("https://r.jina.ai/", Reply::status(502))
            .route("https://api.codetabs.com/", Reply::html()),
    );
    let chain = RelayChain::new(default_relays(), client.clone(), SHORT_TIMEOUT);

    // When: the chain fetches
    chain
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect("codetabs should succeed");

    // Then: both requests were GETs with the ajax marker header
    let requests = client.requests();
    assert_eq!(requests[0].url, format!("https://r.jina.ai/{TARGET_URL}"));
    assert_eq!(
        requests[1].url,
        "https://api.codetabs.com/v1/proxy?quest=https%3A%2F%2Frate.bot.com.tw%2Fxrt%3FLang%3Den-US"
    );
    for request in &requests {
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.headers.get("x-requested-with").map(String::as_str),
            Some("XMLHttpRequest")
        );
    }
}

#[tokio::test]
async fn empty_relay_list_fails_without_network_calls() {
    let client = Arc::new(ScriptedHttpClient::new());
    let chain = RelayChain::new(Vec::new(), client.clone(), SHORT_TIMEOUT);

    let error = chain
        .fetch(TARGET_URL, &CancellationToken::new())
        .await
        .expect_err("nothing to try");

    assert!(matches!(
        error,
        PipelineError::AllProxiesFailed { ref last_error, ref attempted }
            if last_error == "no relays are configured" && attempted.is_empty()
    ));
    assert!(client.requests().is_empty());
}
