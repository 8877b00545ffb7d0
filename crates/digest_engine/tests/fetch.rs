use std::time::Duration;

use digest_engine::{
    BlockingFetcher, FailureKind, FetchSettings, Fetcher, ReqwestBlockingFetcher, ReqwestFetcher,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_page_for_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let output = fetcher.fetch(&server.uri(), "news").await.expect("fetch ok");

    assert_eq!(output.url, format!("{}/news", server.uri()));
    assert_eq!(output.final_url, output.url);
    assert!(output.content_type.unwrap().starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let err = fetcher.fetch(&server.uri(), "missing").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).expect("client");
    let err = fetcher.fetch(&server.uri(), "slow").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).expect("client");
    let err = fetcher.fetch(&server.uri(), "large").await.unwrap_err();
    assert!(
        matches!(err.kind, FailureKind::TooLarge { max_bytes: 10, .. }),
        "unexpected failure: {err:?}"
    );
}

#[tokio::test]
async fn fetcher_reports_invalid_base_url() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let err = fetcher.fetch("not a url", "news").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_reports_refused_connection_as_network() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).expect("client");
    let err = fetcher.fetch("http://127.0.0.1:1", "news").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_fetcher_matches_async_contract() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sport"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>goal</p>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let base_url = server.uri();
    let (ok, gone) = tokio::task::spawn_blocking(move || {
        let fetcher = ReqwestBlockingFetcher::new(FetchSettings::default());
        (
            fetcher.fetch_blocking(&base_url, "sport"),
            fetcher.fetch_blocking(&base_url, "gone"),
        )
    })
    .await
    .expect("blocking task");

    let ok = ok.expect("fetch ok");
    assert_eq!(ok.bytes, b"<p>goal</p>");
    assert_eq!(ok.content_type.as_deref(), Some("text/html"));
    assert_eq!(gone.unwrap_err().kind, FailureKind::HttpStatus(410));
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_fetcher_caps_body_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789abcdef"))
        .mount(&server)
        .await;

    let base_url = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let settings = FetchSettings {
            max_bytes: 8,
            ..FetchSettings::default()
        };
        ReqwestBlockingFetcher::new(settings).fetch_blocking(&base_url, "large")
    })
    .await
    .expect("blocking task");

    assert!(matches!(
        result.unwrap_err().kind,
        FailureKind::TooLarge { max_bytes: 8, .. }
    ));
}
