mod common;

use scrapex_web::{
    Address, DirectFetcher, ExtractionOptions, FetchSettings, InsertionStyle, PageFetcher,
    RelayEndpoint, RelayFetcher, ScrapeError, Scraper, ScrapingResult,
};
use std::num::NonZeroUsize;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head><title>Relayed</title>
<meta property="og:title" content="Relayed OG"></head>
<body><h1>Hello</h1><a href="/about">About</a><p>Body text</p></body></html>"#;

fn fast_settings() -> FetchSettings {
    FetchSettings {
        timeout_ms: 300,
        ..Default::default()
    }
}

fn relays(server: &MockServer) -> Vec<RelayEndpoint> {
    vec![
        RelayEndpoint::new(
            "first",
            format!("{}/first?url=", server.uri()),
            InsertionStyle::Append,
        ),
        RelayEndpoint::new(
            "second",
            format!("{}/second/", server.uri()),
            InsertionStyle::Prepend,
        ),
        RelayEndpoint::new(
            "third",
            format!("{}/third?url=", server.uri()),
            InsertionStyle::Append,
        ),
    ]
}

#[tokio::test]
async fn falls_back_until_a_relay_succeeds() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/second/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/third"))
        .and(query_param("url", "https://example.com"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::with_relays(relays(&server), &fast_settings()).unwrap();
    let result = scraper
        .scrape("example.com", ExtractionOptions::default())
        .await;

    assert_eq!(result.error, None);
    assert_eq!(result.title, "Relayed");
    assert_eq!(result.headings, ["Hello"]);
    assert_eq!(result.links[0].url, "https://example.com/about");
    assert_eq!(result.metadata["og:title"], "Relayed OG");
}

#[tokio::test]
async fn stops_at_the_first_success() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(path("/first"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path_regex("^/(second|third)"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Other</title>"))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = RelayFetcher::new(relays(&server), &fast_settings()).unwrap();
    let raw = fetcher.fetch(&Address::new("example.com")).await.unwrap();

    assert_eq!(raw.source(), "first");
    assert_eq!(raw.text(), PAGE);
}

#[tokio::test]
async fn prepend_relays_receive_the_raw_address() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(path("/second/https://example.com/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let relay = RelayEndpoint::new(
        "second",
        format!("{}/second/", server.uri()),
        InsertionStyle::Prepend,
    );
    let fetcher = RelayFetcher::new(vec![relay], &fast_settings()).unwrap();
    let raw = fetcher
        .fetch(&Address::new("example.com/docs"))
        .await
        .unwrap();

    assert_eq!(raw.source(), "second");
}

#[tokio::test]
async fn each_relay_is_tried_once_and_the_last_cause_is_reported() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(path("/first"))
        .respond_with(ResponseTemplate::new(503).set_body_string("first down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path_regex("^/second/"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/third"))
        .respond_with(ResponseTemplate::new(502).set_body_string(r#"{"error":"bad gateway"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = RelayFetcher::new(relays(&server), &fast_settings()).unwrap();
    let err = fetcher
        .fetch(&Address::new("example.com"))
        .await
        .unwrap_err();

    match &err {
        ScrapeError::FetchFailed { last_cause } => {
            assert_eq!(last_cause, "request failed with status code 502: bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn total_failure_yields_an_empty_error_result() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let scraper = Scraper::with_relays(relays(&server), &fast_settings()).unwrap();
    let result = scraper
        .scrape("example.com", ExtractionOptions::everything(NonZeroUsize::new(3).unwrap()))
        .await;

    let message = result.error.clone().unwrap();
    assert!(message.starts_with("Unable to fetch content:"), "{message}");
    assert_eq!(result, ScrapingResult::failed(message));
}

#[tokio::test]
async fn concurrent_scrapes_share_one_scraper() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(path("/first"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let scraper = Scraper::with_relays(relays(&server), &fast_settings()).unwrap();
    let (a, b) = tokio::join!(
        scraper.scrape("example.com", ExtractionOptions::default()),
        scraper.scrape("example.org", ExtractionOptions::default()),
    );

    assert_eq!(a.title, "Relayed");
    assert_eq!(b.title, "Relayed");
    assert_eq!(a.links[0].url, "https://example.com/about");
    assert_eq!(b.links[0].url, "https://example.org/about");
}

#[tokio::test]
async fn direct_fetch_skips_relays() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "scrapex-direct-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let settings = FetchSettings {
        user_agent: "scrapex-direct-test".into(),
        ..fast_settings()
    };
    let scraper = Scraper::direct(&settings).unwrap();
    let result = scraper
        .scrape(&format!("{}/page", server.uri()), ExtractionOptions::default())
        .await;

    assert_eq!(result.error, None);
    assert_eq!(result.links[0].url, format!("{}/about", server.uri()));
}

#[tokio::test]
async fn direct_failures_are_labelled() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = DirectFetcher::new(&fast_settings()).unwrap();
    let err = fetcher
        .fetch(&Address::new(&server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::DirectFailed { .. }));
    assert!(err.to_string().starts_with("Direct fetch failed:"));
}
