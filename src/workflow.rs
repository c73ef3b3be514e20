//! Enhancement workflow state machine.
//!
//! Single writer, monotonic attempt ids. The machine cycles
//! `Idle -> Uploaded -> Processing -> Completed` and never carries a
//! dedicated error state: inference failures land in `Completed` with a
//! fallback artifact, so a finished attempt always has something to show.
//!
//! Selecting a new image while a call is in flight supersedes the attempt
//! logically — the request is not aborted, but its late resolution is
//! discarded by attempt identity so a slow first request cannot overwrite a
//! faster second one.

use crate::client::{EnhancementRequest, EnhancementResult, Upscaler, DEFAULT_SCALE};
use crate::codec::{self, SelectedImage};
use crate::error::{EncodeError, WorkflowError};
use std::mem;

/// Identity of one enhancement attempt.
///
/// Monotonically increasing, so a resolution from a superseded attempt can
/// be told apart from the current one without comparing images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Current stage of the workflow. Exactly one is active at a time.
#[derive(Debug)]
pub enum WorkflowState {
    Idle,
    Uploaded {
        attempt: AttemptId,
        image: SelectedImage,
        display_ref: String,
    },
    Processing {
        attempt: AttemptId,
        image: SelectedImage,
        display_ref: String,
    },
    Completed {
        image: SelectedImage,
        display_ref: String,
        result: EnhancementResult,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploaded { .. } => "uploaded",
            Self::Processing { .. } => "processing",
            Self::Completed { .. } => "completed",
        }
    }
}

/// Whether a `complete` resolution was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Everything `begin` hands back for the remote call.
#[derive(Debug)]
pub struct PendingSubmit {
    pub attempt: AttemptId,
    pub request: EnhancementRequest,
    pub original_ref: String,
}

/// The only stateful component: owns the current stage and drives the codec
/// and client per attempt.
#[derive(Debug)]
pub struct Workflow {
    state: WorkflowState,
    next_attempt: u64,
    scale: u32,
    face_enhance: bool,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_SCALE, false)
    }

    pub fn with_options(scale: u32, face_enhance: bool) -> Self {
        Self {
            state: WorkflowState::Idle,
            next_attempt: 0,
            // The provider rejects a zero factor; clamp rather than fail.
            scale: scale.max(1),
            face_enhance,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Display reference of the currently selected image, if any.
    pub fn display_ref(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Idle => None,
            WorkflowState::Uploaded { display_ref, .. }
            | WorkflowState::Processing { display_ref, .. }
            | WorkflowState::Completed { display_ref, .. } => Some(display_ref.as_str()),
        }
    }

    /// Result of the completed attempt, if the workflow has one.
    pub fn result(&self) -> Option<&EnhancementResult> {
        match &self.state {
            WorkflowState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Accept a picked image and move to `Uploaded`, computing the "before"
    /// display reference eagerly.
    ///
    /// Valid from every state: from `Completed` this is an implicit reset,
    /// and from `Processing` it supersedes the in-flight attempt. On an
    /// encode error the current state is left untouched.
    pub fn select(&mut self, image: SelectedImage) -> Result<AttemptId, EncodeError> {
        let display_ref = codec::display_ref(&image)?;
        if let WorkflowState::Processing { attempt, .. } = &self.state {
            tracing::debug!(
                superseded = attempt.value(),
                "new selection supersedes in-flight attempt"
            );
        }
        self.next_attempt += 1;
        let attempt = AttemptId(self.next_attempt);
        self.state = WorkflowState::Uploaded {
            attempt,
            image,
            display_ref,
        };
        Ok(attempt)
    }

    /// Flip `Uploaded -> Processing` and build the request for the remote
    /// call. The state changes before any network work so an in-progress
    /// indicator can show without delay.
    ///
    /// An encode error here returns the workflow to `Idle`.
    pub fn begin(&mut self) -> Result<PendingSubmit, WorkflowError> {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        match state {
            WorkflowState::Uploaded {
                attempt,
                image,
                display_ref,
            } => {
                let payload = codec::encode(&image.bytes, &image.mime)?;
                let request = EnhancementRequest {
                    payload,
                    scale: self.scale,
                    face_enhance: self.face_enhance,
                };
                let original_ref = display_ref.clone();
                self.state = WorkflowState::Processing {
                    attempt,
                    image,
                    display_ref,
                };
                Ok(PendingSubmit {
                    attempt,
                    request,
                    original_ref,
                })
            }
            other => {
                let name = other.name();
                self.state = other;
                Err(WorkflowError::NotUploaded(name))
            }
        }
    }

    /// Apply a submit resolution. Only the attempt currently in flight may
    /// complete; anything else is stale and discarded without touching the
    /// state.
    pub fn complete(&mut self, attempt: AttemptId, result: EnhancementResult) -> Resolution {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        match state {
            WorkflowState::Processing {
                attempt: current,
                image,
                display_ref,
            } if current == attempt => {
                self.state = WorkflowState::Completed {
                    image,
                    display_ref,
                    result,
                };
                Resolution::Applied
            }
            other => {
                tracing::debug!(
                    attempt = attempt.value(),
                    state = other.name(),
                    "discarding stale enhancement result"
                );
                self.state = other;
                Resolution::Stale
            }
        }
    }

    /// Discard the current attempt and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = WorkflowState::Idle;
    }

    /// Drive one full attempt on the current thread: `begin`, one submit,
    /// `complete`. The submit resolution here can never be stale because
    /// nothing else runs between the two transitions.
    pub fn run(&mut self, upscaler: &dyn Upscaler) -> Result<(), WorkflowError> {
        let pending = self.begin()?;
        let result = upscaler.submit(&pending.request, &pending.original_ref);
        self.complete(pending.attempt, result);
        Ok(())
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
