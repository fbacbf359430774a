//! Integration tests for `FirecrawlClient` and `scrape_with_retry`.
//!
//! Uses `wiremock` to stand up a local scrape API for each test so no real
//! network traffic is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fpvdb_scraper::{scrape_with_retry, FirecrawlClient, PageSource, RetryPolicy, ScraperError};

const PAGE_URL: &str = "https://www.getfpv.com/betafpv-meteor75-pro.html";

fn test_client(server: &MockServer) -> FirecrawlClient {
    FirecrawlClient::new(&server.uri(), Some("fc-test"), 5, "fpvdb-test/0.1")
        .expect("failed to build test FirecrawlClient")
}

fn ok_body() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "markdown": "# Meteor75 Pro\n$129.99",
            "metadata": {
                "title": "BetaFPV Meteor75 Pro - GetFPV",
                "ogImage": "https://cdn.getfpv.com/meteor75.jpg"
            }
        }
    })
}

#[tokio::test]
async fn scrape_sends_bearer_and_markdown_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", "Bearer fc-test"))
        .and(body_partial_json(json!({ "url": PAGE_URL, "formats": ["markdown"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_client(&server).scrape(PAGE_URL).await.unwrap();

    assert_eq!(page.content(), Some("# Meteor75 Pro\n$129.99"));
    assert_eq!(page.metadata.title(), Some("BetaFPV Meteor75 Pro - GetFPV"));
    assert_eq!(
        page.metadata.og_image(),
        Some("https://cdn.getfpv.com/meteor75.jpg")
    );
}

#[tokio::test]
async fn scrape_maps_429_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape(PAGE_URL).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::RateLimited { retry_after_secs: 12, .. }),
        "expected RateLimited, got: {err:?}"
    );
}

#[tokio::test]
async fn scrape_maps_other_status_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape(PAGE_URL).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 402, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn scrape_reports_service_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "blocked by robots" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server).scrape(PAGE_URL).await.unwrap_err();
    match err {
        ScraperError::Scrape { url, reason } => {
            assert_eq!(url, PAGE_URL);
            assert_eq!(reason, "blocked by robots");
        }
        other => panic!("expected Scrape, got: {other:?}"),
    }
}

#[tokio::test]
async fn scrape_reports_invalid_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape(PAGE_URL).await.unwrap_err();
    assert!(matches!(err, ScraperError::Deserialize { .. }));
}

#[tokio::test]
async fn retry_recovers_after_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let page = scrape_with_retry(&client, PAGE_URL, RetryPolicy::new(3, Duration::ZERO))
        .await
        .unwrap();
    assert!(page.content().is_some());
}

#[tokio::test]
async fn retry_stops_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = scrape_with_retry(&client, PAGE_URL, RetryPolicy::new(3, Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::RateLimited { .. }));
}

#[tokio::test]
async fn retry_treats_missing_markdown_as_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": {} })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = scrape_with_retry(&client, PAGE_URL, RetryPolicy::new(3, Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::EmptyPage { .. }));
}
