use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use sourcedownload_e2e_tests::{MockServer, RecordingProgress, downloader, init_tracing};
use sourcedownload_lib::SourceDownloadError;
use std::sync::Arc;

#[tokio::test]
async fn test_fetch_streams_body_and_reports_progress() {
    init_tracing();
    let server = MockServer::start().await;
    let chunks: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();
    let expected: Vec<u8> = chunks.concat();
    server.add_chunked_artifact("/pool/big.tar.xz", chunks);

    let temp = TempDir::new().unwrap();
    let destination = temp.child("big.tar.xz");
    let progress = Arc::new(RecordingProgress::default());

    let written = downloader(progress.clone())
        .fetch(destination.path(), &server.url("/pool/big.tar.xz"))
        .await
        .unwrap();

    assert_eq!(written, expected.len() as u64);
    assert_eq!(std::fs::read(destination.path()).unwrap(), expected);
    temp.child("big.tar.xz.tmp")
        .assert(predicate::path::missing());

    let updates = progress.updates.lock().unwrap();
    assert!(!updates.is_empty());
    assert!(updates.iter().all(|(name, _)| name == "big.tar.xz"));
    assert!(updates.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(updates.last().unwrap().1, expected.len() as u64);

    let finished = progress.finished.lock().unwrap();
    assert_eq!(
        *finished,
        vec![("big.tar.xz".to_string(), expected.len() as u64)]
    );
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let server = MockServer::start().await;
    server.add_artifact("/pool/empty", b"");

    let temp = TempDir::new().unwrap();
    let destination = temp.child("empty");
    let progress = Arc::new(RecordingProgress::default());

    let written = downloader(progress.clone())
        .fetch(destination.path(), &server.url("/pool/empty"))
        .await
        .unwrap();

    assert_eq!(written, 0);
    destination.assert("");
    assert_eq!(
        *progress.finished.lock().unwrap(),
        vec![("empty".to_string(), 0)]
    );
}

#[tokio::test]
async fn test_fetch_replaces_existing_destination() {
    let server = MockServer::start().await;
    server.add_artifact("/pool/a.tar.gz", b"new");

    let temp = TempDir::new().unwrap();
    let destination = temp.child("a.tar.gz");
    destination.write_str("old content that is longer").unwrap();

    downloader(Arc::new(RecordingProgress::default()))
        .fetch(destination.path(), &server.url("/pool/a.tar.gz"))
        .await
        .unwrap();

    destination.assert("new");
}

#[tokio::test]
async fn test_fetch_into_missing_directory_fails_before_request() {
    let server = MockServer::start().await;
    server.add_artifact("/pool/a.tar.gz", b"content");

    let temp = TempDir::new().unwrap();
    let destination = temp.child("missing/a.tar.gz");

    let err = downloader(Arc::new(RecordingProgress::default()))
        .fetch(destination.path(), &server.url("/pool/a.tar.gz"))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceDownloadError::Io { .. }));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_error_status_is_not_saved() {
    let server = MockServer::start().await;

    let temp = TempDir::new().unwrap();
    let destination = temp.child("a.tar.gz");

    let err = downloader(Arc::new(RecordingProgress::default()))
        .fetch(destination.path(), &server.url("/pool/a.tar.gz"))
        .await
        .unwrap_err();

    match err {
        SourceDownloadError::Transport(e) => {
            assert_eq!(e.status().map(|s| s.as_u16()), Some(404));
        }
        other => panic!("Expected a transport error, got {other:?}"),
    }
    destination.assert(predicate::path::missing());
    temp.child("a.tar.gz.tmp").assert(predicate::path::exists());
}

#[tokio::test]
async fn test_body_failure_mid_stream_is_an_io_error() {
    init_tracing();
    let server = MockServer::start().await;
    server.add_truncated_artifact("/pool/a.tar.gz", &[7u8; 4096]);

    let temp = TempDir::new().unwrap();
    let destination = temp.child("a.tar.gz");

    let err = downloader(Arc::new(RecordingProgress::default()))
        .fetch(destination.path(), &server.url("/pool/a.tar.gz"))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceDownloadError::Io { .. }), "{err:?}");
    destination.assert(predicate::path::missing());
    temp.child("a.tar.gz.tmp").assert(predicate::path::exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_rename_keeps_temp_file() {
    let server = MockServer::start().await;
    server.add_artifact("/pool/a.tar.gz", b"content");

    let temp = TempDir::new().unwrap();
    let destination = temp.child("a.tar.gz");
    destination.child("occupied").write_str("x").unwrap();

    let err = downloader(Arc::new(RecordingProgress::default()))
        .fetch(destination.path(), &server.url("/pool/a.tar.gz"))
        .await
        .unwrap_err();

    match err {
        SourceDownloadError::Io { path, .. } => assert_eq!(path, destination.path()),
        other => panic!("Expected an io error, got {other:?}"),
    }
    destination.child("occupied").assert("x");
    temp.child("a.tar.gz.tmp").assert("content");
}
