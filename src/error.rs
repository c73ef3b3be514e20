//! Error taxonomy for the enhancement workflow.
//!
//! Only encode and configuration errors are allowed to interrupt the
//! workflow. Inference-path errors never surface here: the client absorbs
//! them into a fallback result so the state machine has no error state.
//! Download and share errors are non-blocking notifications that leave the
//! completed state untouched.

use thiserror::Error;

/// The selected file could not be turned into a transport payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("image data is empty")]
    EmptyImage,
    #[error("unsupported media type {0:?} (expected an image)")]
    NotAnImage(String),
}

/// Missing provider configuration. Fatal at startup, never per-request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SCALIFY_API_TOKEN is not set (inference credential required)")]
    MissingToken,
    #[error("SCALIFY_MODEL is not set (inference model identifier required)")]
    MissingModel,
}

/// Workflow-level failures that interrupt an attempt before the remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("no selected image to process (workflow is {0})")]
    NotUploaded(&'static str),
}

/// A finalized artifact could not be fetched or written to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("artifact fetch failed: {0}")]
    Fetch(String),
    #[error("artifact reference {0:?} is not fetchable")]
    UnsupportedRef(String),
    #[error("write enhanced image: {0}")]
    Io(#[from] std::io::Error),
}

/// Neither the share command nor the clipboard fallback could run.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share command failed: {0}")]
    Command(String),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error(transparent)]
    Download(#[from] DownloadError),
}
