// recast-core/tests/acquisition_tests.rs
//
// Direct-URL downloads against a throwaway local HTTP server.

use recast_core::acquisition::{InputSource, acquire, download_direct_url};
use recast_core::external::mocks::MockPlatformExtractor;
use recast_core::{CoreConfig, CoreConfigBuilder, CoreError};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Serves a single request with `status` and `body`, then exits.
fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        // Drain the request head
        while reader.read_line(&mut line).unwrap() > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
    });
    (format!("http://{addr}"), handle)
}

/// Sends headers and part of the body, then holds the connection open.
fn serve_stalled(stall: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap_or(0) > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\nContent-Type: video/mp4\r\n\r\npartial",
        );
        let _ = stream.flush();
        thread::sleep(stall);
    });
    format!("http://{addr}")
}

fn config_in(dir: &TempDir) -> CoreConfig {
    CoreConfigBuilder::new()
        .temp_dir(dir.path().to_path_buf())
        .http_timeout_secs(5)
        .build()
}

#[test]
fn test_download_direct_url_saves_body() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("200 OK", b"fake mkv payload");

    let media = download_direct_url(&config_in(&dir), &format!("{base}/media/Concert.MKV")).unwrap();
    server.join().unwrap();

    assert_eq!(media.display_name(), "Concert.MKV");
    assert_eq!(media.size(), 16);
    assert!(media.is_temporary());
    assert_eq!(media.path().extension().unwrap(), "mkv");
    assert_eq!(std::fs::read(media.path()).unwrap(), b"fake mkv payload");

    let path = media.path().to_path_buf();
    drop(media);
    assert!(!path.exists(), "downloaded source removed on drop");
}

#[test]
fn test_download_without_file_name_uses_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("200 OK", b"bytes");

    let media = download_direct_url(&config_in(&dir), &format!("{base}/")).unwrap();
    server.join().unwrap();

    assert_eq!(media.display_name(), "download");
    assert_eq!(media.path().extension().unwrap(), "bin");
}

#[test]
fn test_download_http_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let (base, server) = serve_once("404 Not Found", b"nope");

    let result = download_direct_url(&config_in(&dir), &format!("{base}/missing.mp4"));
    server.join().unwrap();

    assert!(matches!(result, Err(CoreError::Download(_))));
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 0, "no temp file left after a failed download");
}

#[test]
fn test_download_times_out_on_stalled_server() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_stalled(Duration::from_secs(10));
    let config = CoreConfigBuilder::new()
        .temp_dir(dir.path().to_path_buf())
        .http_timeout_secs(1)
        .build();

    let started = Instant::now();
    let result = download_direct_url(&config, &format!("{base}/slow.mp4"));

    assert!(matches!(result, Err(CoreError::Download(_))), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(6), "took {:?}", started.elapsed());
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 0, "partial download removed");
}

#[test]
fn test_acquire_dispatches_by_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let extractor = MockPlatformExtractor::new("unused.mp4", b"");

    let upload = acquire(
        &config,
        &extractor,
        InputSource::Upload {
            file_name: "voice memo.m4a".to_string(),
            bytes: b"m4a data".to_vec(),
        },
    )
    .unwrap();
    assert_eq!(upload.display_name(), "voice memo.m4a");
    assert_eq!(upload.path().extension().unwrap(), "m4a");

    let missing = acquire(
        &config,
        &extractor,
        InputSource::Local(dir.path().join("nope.mp4")),
    );
    assert!(matches!(missing, Err(CoreError::InputNotFound(_))));

    let platform = acquire(
        &config,
        &extractor,
        InputSource::PlatformUrl("https://vimeo.com/1".to_string()),
    );
    assert!(matches!(platform, Err(CoreError::PlatformSourcesDisabled)));
    assert!(extractor.urls().is_empty());
}
