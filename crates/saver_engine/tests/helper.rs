use std::io::{Cursor, Read};
use std::sync::Once;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pretty_assertions::assert_eq;
use saver_core::ImageFormat;
use saver_engine::{
    CoverPayload, DownloadStyleRequest, FetchSettings, HelperError, HelperSession, ImageEntry,
    MemoryStagingStore, ReqwestFetcher, StagingError, StagingStore, DOWNLOAD_STYLE_ACTION,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(saver_logging::initialize_for_tests);
}

fn staged_request(image_url: &str) -> DownloadStyleRequest {
    DownloadStyleRequest {
        action: DOWNLOAD_STYLE_ACTION.to_string(),
        sref: "987654".to_string(),
        images: vec![ImageEntry {
            url: image_url.to_string(),
            name: "987654_a_640_N.webp".to_string(),
        }],
        cover: CoverPayload {
            data_url: format!("data:image/jpeg;base64,{}", BASE64.encode(b"cover-bytes")),
            name: "987654_cover.jpg".to_string(),
        },
        storage_method: saver_core::StorageMethod::Prompt,
    }
}

#[tokio::test]
async fn open_requires_a_staging_key() {
    setup();
    let store = MemoryStagingStore::new();
    let err = HelperSession::open(&store, "download.html").await.unwrap_err();
    assert!(matches!(err, HelperError::MissingKey));

    let err = HelperSession::open(&store, "download.html?id=")
        .await
        .unwrap_err();
    assert!(matches!(err, HelperError::MissingKey));
}

#[tokio::test(start_paused = true)]
async fn open_fails_when_nothing_is_staged() {
    setup();
    let store = MemoryStagingStore::new();
    let err = HelperSession::open(&store, "download.html?id=dl_unknown")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HelperError::Staging(StagingError::NotFound { .. })
    ));
}

#[tokio::test]
async fn open_claims_the_staged_request_exactly_once() {
    setup();
    let store = MemoryStagingStore::new();
    store
        .put("dl_1", &staged_request("https://cdn.test/a_640_N.webp"))
        .unwrap();

    let session = HelperSession::open(&store, "download.html?id=dl_1")
        .await
        .expect("opens");
    assert_eq!(session.file_name(), "sref_987654.zip");
    assert_eq!(session.request().images.len(), 1);

    // The key is consumed, so a reload cannot re-trigger the download.
    let err = HelperSession::open(&store, "download.html?id=dl_1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HelperError::Staging(StagingError::NotFound { .. })
    ));
}

#[tokio::test]
async fn open_sanitizes_the_archive_name() {
    setup();
    let store = MemoryStagingStore::new();
    let mut request = staged_request("https://cdn.test/a_640_N.webp");
    request.sref = "12 34/56".to_string();
    store.put("dl_2", &request).unwrap();

    let session = HelperSession::open(&store, "download.html?id=dl_2")
        .await
        .expect("opens");
    assert_eq!(session.file_name(), "sref_12_34_56.zip");
}

#[tokio::test]
async fn confirm_builds_and_delivers_the_archive() {
    setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a_640_N.webp"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"image-bytes".to_vec(), "image/webp"))
        .mount(&server)
        .await;

    let store = MemoryStagingStore::new();
    let url = format!("{}/a_640_N.webp", server.uri());
    store.put("dl_3", &staged_request(&url)).unwrap();

    let session = HelperSession::open(&store, "download.html?id=dl_3")
        .await
        .expect("opens");

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let temp = TempDir::new().unwrap();
    let delivered = session
        .confirm(&fetcher, ImageFormat::Original, temp.path())
        .await
        .expect("confirmed");
    assert_eq!(delivered, temp.path().join("sref_987654.zip"));

    let mut zip = zip::ZipArchive::new(Cursor::new(std::fs::read(&delivered).unwrap())).unwrap();
    assert_eq!(zip.len(), 2);

    let mut image = Vec::new();
    zip.by_name("987654_a_640_N.webp")
        .unwrap()
        .read_to_end(&mut image)
        .unwrap();
    assert_eq!(image, b"image-bytes");

    let mut cover = Vec::new();
    zip.by_name("987654_cover.jpg")
        .unwrap()
        .read_to_end(&mut cover)
        .unwrap();
    assert_eq!(cover, b"cover-bytes");
}
