//! Image codec adapter: raw picked files to transport-ready data URIs.
//!
//! Everything here is pure and deterministic; no network access, no reads
//! beyond the bytes already handed in. The same data URI doubles as the
//! optimistic "before" display reference, so the comparison view can render
//! immediately without waiting on the provider.

use crate::error::EncodeError;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::path::Path;

/// A user-picked image: raw bytes plus MIME type.
///
/// Immutable once created; owned by the workflow for the duration of one
/// enhancement attempt and discarded on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl SelectedImage {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }
}

/// Self-contained transport representation of a selected image
/// (`data:<mime>;base64,...`). Derived deterministically; never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Encode raw image bytes into a base64 data URI.
///
/// Fails only for empty input or a MIME type outside `image/*`.
pub fn encode(bytes: &[u8], mime: &str) -> Result<EncodedPayload, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::EmptyImage);
    }
    if !mime.starts_with("image/") {
        return Err(EncodeError::NotAnImage(mime.to_string()));
    }
    Ok(EncodedPayload(format!(
        "data:{mime};base64,{}",
        BASE64.encode(bytes)
    )))
}

/// Displayable "before" reference for a selected image.
pub fn display_ref(image: &SelectedImage) -> Result<String, EncodeError> {
    encode(&image.bytes, &image.mime).map(EncodedPayload::into_string)
}

/// Read a file into a `SelectedImage`, deriving the MIME type from the
/// extension the way an `image/*` picker filter would.
///
/// Unrecognized extensions map to `application/octet-stream` so selection
/// rejects them with a proper encode error instead of guessing.
pub fn from_path(path: &Path) -> Result<SelectedImage> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mime = guess_mime(path).unwrap_or("application/octet-stream");
    Ok(SelectedImage::new(bytes, mime))
}

/// Map a file extension to its image MIME type.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
