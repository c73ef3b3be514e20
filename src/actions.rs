//! Result actions: persist or share a finalized artifact.
//!
//! Both actions operate only on the artifact reference from a completed
//! attempt. Failures are notifications, not crashes: the workflow state is
//! never affected by a download or share going wrong.

use crate::error::{DownloadError, ShareError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound for a fetched artifact (a 4x upscale of a phone photo fits
/// comfortably).
const FETCH_LIMIT_BYTES: u64 = 64 * 1024 * 1024;

/// How a share request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// A share command received the artifact as a temp file.
    Command { program: String, path: PathBuf },
    /// No share command available; the reference was copied to the clipboard.
    ClipboardCopy,
}

/// Fetch the bytes behind an artifact reference.
///
/// Data URIs decode locally; `http(s)` references cost exactly one GET with
/// no retries.
pub fn fetch_artifact(artifact_ref: &str) -> Result<Vec<u8>, DownloadError> {
    if let Some(rest) = artifact_ref.strip_prefix("data:") {
        let encoded = rest
            .split_once("base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| DownloadError::UnsupportedRef(preview(artifact_ref)))?;
        return BASE64
            .decode(encoded.trim())
            .map_err(|err| DownloadError::Fetch(format!("decode data URI: {err}")));
    }
    if artifact_ref.starts_with("http://") || artifact_ref.starts_with("https://") {
        let mut response = ureq::get(artifact_ref)
            .call()
            .map_err(|err| DownloadError::Fetch(err.to_string()))?;
        return response
            .body_mut()
            .with_config()
            .limit(FETCH_LIMIT_BYTES)
            .read_to_vec()
            .map_err(|err| DownloadError::Fetch(err.to_string()));
    }
    Err(DownloadError::UnsupportedRef(preview(artifact_ref)))
}

/// Save the artifact under a timestamped, session-unique filename and return
/// the path written.
pub fn download(artifact_ref: &str, out_dir: &Path) -> Result<PathBuf, DownloadError> {
    let bytes = fetch_artifact(artifact_ref)?;
    fs::create_dir_all(out_dir)?;
    let path = unique_download_path(out_dir)?;
    fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved enhanced image");
    Ok(path)
}

/// Where downloads land when no directory is given.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Share the artifact: hand it to the configured share command when one is
/// available, otherwise copy the reference to the clipboard.
///
/// A failing share command degrades to the clipboard path rather than
/// erroring out; only when the clipboard also fails does the caller see a
/// `ShareError`.
pub fn share(artifact_ref: &str) -> Result<ShareOutcome, ShareError> {
    if let Some(argv) = resolve_share_command() {
        match share_via_command(&argv, artifact_ref) {
            Ok(outcome) => return Ok(outcome),
            Err(err) => {
                tracing::warn!(error = %err, "share command failed, copying reference instead");
            }
        }
    }
    copy_to_clipboard(artifact_ref)?;
    Ok(ShareOutcome::ClipboardCopy)
}

/// `enhanced-image-<epoch-millis>.jpg`, bumping a suffix when two downloads
/// land in the same millisecond.
fn unique_download_path(out_dir: &Path) -> Result<PathBuf, DownloadError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let base = out_dir.join(format!("enhanced-image-{millis}.jpg"));
    if !base.exists() {
        return Ok(base);
    }
    for n in 1..1000u32 {
        let candidate = out_dir.join(format!("enhanced-image-{millis}-{n}.jpg"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(DownloadError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        "could not allocate a unique download filename",
    )))
}

/// Resolve the share command: `SCALIFY_SHARE_COMMAND` when set, otherwise
/// the platform opener if it exists on PATH.
fn resolve_share_command() -> Option<Vec<String>> {
    if let Ok(raw) = env::var("SCALIFY_SHARE_COMMAND") {
        if !raw.trim().is_empty() {
            match shell_words::split(&raw) {
                Ok(argv) if !argv.is_empty() => return Some(argv),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring unparsable SCALIFY_SHARE_COMMAND");
                }
            }
        }
    }
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    which::which(opener).ok().map(|_| vec![opener.to_string()])
}

fn share_via_command(argv: &[String], artifact_ref: &str) -> Result<ShareOutcome, ShareError> {
    let bytes = fetch_artifact(artifact_ref)?;
    let mut file = tempfile::Builder::new()
        .prefix("scalify-share-")
        .suffix(".jpg")
        .tempfile()
        .map_err(|err| ShareError::Command(format!("create share file: {err}")))?;
    file.write_all(&bytes)
        .map_err(|err| ShareError::Command(format!("write share file: {err}")))?;
    // Keep the file so the share target can still read it after we exit.
    let (_, path) = file
        .keep()
        .map_err(|err| ShareError::Command(format!("persist share file: {err}")))?;

    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .arg(&path)
        .status()
        .map_err(|err| ShareError::Command(format!("spawn {}: {err}", argv[0])))?;
    if !status.success() {
        return Err(ShareError::Command(format!(
            "{} exited with {status}",
            argv[0]
        )));
    }
    Ok(ShareOutcome::Command {
        program: argv[0].clone(),
        path,
    })
}

fn copy_to_clipboard(artifact_ref: &str) -> Result<(), ShareError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|err| ShareError::Clipboard(err.to_string()))?;
    clipboard
        .set_text(artifact_ref.to_string())
        .map_err(|err| ShareError::Clipboard(err.to_string()))?;
    Ok(())
}

fn preview(artifact_ref: &str) -> String {
    const MAX: usize = 48;
    if artifact_ref.len() <= MAX {
        return artifact_ref.to_string();
    }
    let cut = artifact_ref
        .char_indices()
        .take_while(|(idx, _)| *idx < MAX)
        .last()
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0);
    format!("{}...", &artifact_ref[..cut])
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
