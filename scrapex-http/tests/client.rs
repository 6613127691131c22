use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scrapex_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_retry() -> RequestOpts {
    RequestOpts {
        retries: Some(0),
        ..Default::default()
    }
}

#[tokio::test]
async fn returns_body_and_sends_caller_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "scrapex-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("scrapex-test"));
    let client = HttpClient::new().unwrap();
    let body = client
        .get_bytes(
            &format!("{}/page", server.uri()),
            RequestOpts {
                headers: Some(headers),
                ..no_retry()
            },
        )
        .await
        .unwrap();

    assert_eq!(body, b"<p>hello</p>");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_bytes(&format!("{}/missing", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried_within_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .with_priority(2)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap().with_retries(1);
    let body = client
        .get_bytes(&server.uri(), RequestOpts::default())
        .await
        .unwrap();

    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = HttpClient::new()
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client
        .get_bytes(&server.uri(), no_retry())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout(d) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn malformed_urls_are_rejected_before_sending() {
    let client = HttpClient::new().unwrap();
    let err = client
        .get_bytes("not a url", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Url(_)));
}
