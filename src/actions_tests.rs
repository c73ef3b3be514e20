use super::{download, fetch_artifact, share, ShareOutcome};
use crate::codec;
use crate::error::DownloadError;

fn data_uri(bytes: &[u8]) -> String {
    codec::encode(bytes, "image/jpeg")
        .expect("encode fixture")
        .into_string()
}

#[test]
fn fetch_artifact_decodes_data_uris() {
    let bytes = vec![7u8, 8, 9, 10, 250];
    let fetched = fetch_artifact(&data_uri(&bytes)).expect("fetch");
    assert_eq!(fetched, bytes);
}

#[test]
fn fetch_artifact_rejects_data_uri_without_base64_payload() {
    let err = fetch_artifact("data:image/jpeg,plain-not-base64").expect_err("no base64 marker");
    assert!(matches!(err, DownloadError::UnsupportedRef(_)), "{err}");
}

#[test]
fn fetch_artifact_rejects_unknown_schemes() {
    for artifact_ref in ["ftp://example.com/a.jpg", "file:///tmp/a.jpg", "garbage"] {
        let err = fetch_artifact(artifact_ref).expect_err("unfetchable ref");
        assert!(matches!(err, DownloadError::UnsupportedRef(_)), "{err}");
    }
}

#[test]
fn fetch_artifact_reports_corrupt_base64() {
    let err = fetch_artifact("data:image/jpeg;base64,!!!not-base64!!!").expect_err("corrupt");
    assert!(matches!(err, DownloadError::Fetch(_)), "{err}");
}

#[test]
fn download_writes_timestamped_jpg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bytes = b"enhanced-bytes".to_vec();

    let path = download(&data_uri(&bytes), dir.path()).expect("download");

    let name = path.file_name().and_then(|n| n.to_str()).expect("name");
    assert!(name.starts_with("enhanced-image-"), "name: {name}");
    assert!(name.ends_with(".jpg"), "name: {name}");
    assert_eq!(std::fs::read(&path).expect("read back"), bytes);
}

#[test]
fn downloads_in_the_same_session_never_collide() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifact = data_uri(b"same-artifact");

    let first = download(&artifact, dir.path()).expect("first download");
    let second = download(&artifact, dir.path()).expect("second download");
    let third = download(&artifact, dir.path()).expect("third download");

    assert_ne!(first, second);
    assert_ne!(second, third);
    assert_ne!(first, third);
    assert!(first.exists() && second.exists() && third.exists());
}

#[test]
fn failed_download_leaves_no_file_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");

    let err = download("not-a-ref", &out).expect_err("unfetchable");
    assert!(matches!(err, DownloadError::UnsupportedRef(_)), "{err}");
    // The output directory is not even created when the fetch fails.
    assert!(!out.exists());
}

#[test]
fn share_prefers_the_configured_command_and_degrades_gracefully() {
    // One test body: these cases mutate the same process-wide variable and
    // must not interleave with each other under the parallel test runner.
    let artifact = data_uri(b"share-me");

    std::env::set_var("SCALIFY_SHARE_COMMAND", "true");
    match share(&artifact).expect("share via `true`") {
        ShareOutcome::Command { program, path } => {
            assert_eq!(program, "true");
            assert!(path.exists());
            let _ = std::fs::remove_file(path);
        }
        other => panic!("expected command outcome, got {other:?}"),
    }

    // A failing command falls back to the clipboard, which may itself be
    // unavailable on a headless runner; either way no panic escapes and the
    // command outcome is never reported.
    std::env::set_var("SCALIFY_SHARE_COMMAND", "false");
    match share(&artifact) {
        Ok(ShareOutcome::Command { .. }) => panic!("failing command must not count as shared"),
        Ok(ShareOutcome::ClipboardCopy) | Err(_) => {}
    }

    std::env::remove_var("SCALIFY_SHARE_COMMAND");
}
