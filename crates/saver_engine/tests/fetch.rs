use std::time::Duration;

use pretty_assertions::assert_eq;
use saver_engine::{Blob, FetchError, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_returns_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.webp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"webp-bytes".to_vec(), "image/webp"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/img.webp", server.uri());

    let blob = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(blob.bytes, b"webp-bytes");
    assert_eq!(blob.mime(), Some("image/webp"));
}

#[tokio::test]
async fn fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err, FetchError::Status(404));
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
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
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout);
}

#[tokio::test]
async fn fetch_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/webp")
                .set_body_raw(vec![0u8; 32], "image/webp"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/large", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err, FetchError::TooLarge { max_bytes: 10 });
}

#[test]
fn blob_mime_strips_parameters() {
    let blob = Blob {
        bytes: Vec::new(),
        content_type: Some("image/webp; charset=binary".to_string()),
    };
    assert_eq!(blob.mime(), Some("image/webp"));

    let empty = Blob {
        bytes: Vec::new(),
        content_type: Some("  ".to_string()),
    };
    assert_eq!(empty.mime(), None);
}
