// recast-cli/tests/web_tests.rs
//
// Drives the browser UI router in-process with mock ffmpeg and extractor.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use recast_cli::web::{AppState, router};
use recast_core::CoreConfigBuilder;
use recast_core::external::mocks::{MockFfmpegSpawner, MockPlatformExtractor};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "recast-test-boundary";

struct Fixture {
    _temp: TempDir,
    spawner: MockFfmpegSpawner,
    extractor: MockPlatformExtractor,
    app: Router,
}

fn fixture_with(spawner: MockFfmpegSpawner, allow_platform_sources: bool, max_upload_bytes: usize) -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let config = CoreConfigBuilder::new()
        .temp_dir(temp.path().to_path_buf())
        .ffmpeg_path("/nonexistent/recast/ffmpeg".into())
        .allow_platform_sources(allow_platform_sources)
        .max_upload_bytes(max_upload_bytes)
        .build();
    let extractor = MockPlatformExtractor::new("Lecture [a1].mkv", b"mkv");
    let app = router(AppState::new(config, spawner.clone(), extractor.clone()));
    Fixture {
        _temp: temp,
        spawner,
        extractor,
        app,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockFfmpegSpawner::succeeding(b"converted".to_vec()), false, 1024 * 1024)
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_index_page_served() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<form method=\"post\" action=\"/convert\""));
    assert!(html.contains("name=\"crf\""));
    assert!(html.contains("Legal notice"));
}

#[tokio::test]
async fn test_healthz_reports_missing_ffmpeg() {
    let fx = fixture();
    let response = fx
        .app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ffmpeg"], false);
}

#[tokio::test]
async fn test_upload_converted_to_mp3_attachment() {
    let fx = fixture();
    let request = multipart_request(&[
        Part::Text("source", "upload"),
        Part::Text("target", "mp3"),
        Part::Text("bitrate", "128"),
        Part::File("Voice Memo.m4a", b"m4a bytes"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"Voice_Memo_128k.mp3\""));
    assert_eq!(body_bytes(response).await, b"converted");

    let calls = fx.spawner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].windows(2).any(|w| w[0] == "-b:a" && w[1] == "128k"));
}

#[tokio::test]
async fn test_mp4_options_reach_ffmpeg() {
    let fx = fixture();
    let request = multipart_request(&[
        Part::Text("target", "mp4"),
        Part::Text("resolution", "1080p"),
        Part::Text("crf", "19"),
        Part::Text("audio_bitrate", "256"),
        Part::Text("preset", "slow"),
        Part::Text("normalize", "on"),
        Part::File("trip.avi", b"avi"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("trip_1080p_crf19_256k.mp4"));

    let args = &fx.spawner.calls()[0];
    assert!(args.windows(2).any(|w| w[0] == "-vf" && w[1] == "scale=-2:1080"));
    assert!(args.windows(2).any(|w| w[0] == "-preset" && w[1] == "slow"));
    assert!(args.iter().any(|a| a.starts_with("loudnorm")));
}

#[tokio::test]
async fn test_invalid_option_is_bad_request() {
    let fx = fixture();
    let request = multipart_request(&[
        Part::Text("target", "mp4"),
        Part::Text("crf", "35"),
        Part::File("clip.mov", b"mov"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("CRF 35"));
    assert!(fx.spawner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_upload_is_bad_request() {
    let fx = fixture();
    let request = multipart_request(&[Part::Text("source", "upload"), Part::Text("target", "mp3")]);
    let response = fx.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_platform_source_disabled_by_default() {
    let fx = fixture();
    let request = multipart_request(&[
        Part::Text("source", "platform"),
        Part::Text("url", "https://vimeo.com/42"),
        Part::Text("target", "mp3"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fx.extractor.urls().is_empty());
}

#[tokio::test]
async fn test_platform_source_when_enabled() {
    let fx = fixture_with(MockFfmpegSpawner::default(), true, 1024 * 1024);
    let request = multipart_request(&[
        Part::Text("source", "platform"),
        Part::Text("url", "https://vimeo.com/42"),
        Part::Text("target", "mp3"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("Lecture__a1_192k.mp3"));
    assert_eq!(fx.extractor.urls(), vec!["https://vimeo.com/42".to_string()]);
}

#[tokio::test]
async fn test_encoder_failure_is_bad_gateway_with_log() {
    let spawner = MockFfmpegSpawner::failing(1, &["Stream #0:0: Video: h264", "Conversion failed!"]);
    let fx = fixture_with(spawner, false, 1024 * 1024);
    let request = multipart_request(&[
        Part::Text("target", "mp3"),
        Part::File("broken.mp4", b"not really mp4"),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Encoding failed"));
    assert!(html.contains("Conversion failed!"));
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let fx = fixture_with(MockFfmpegSpawner::default(), false, 16);
    let request = multipart_request(&[
        Part::Text("target", "mp3"),
        Part::File("big.wav", &[0u8; 64]),
    ]);
    let response = fx.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(fx.spawner.calls().is_empty());
}
