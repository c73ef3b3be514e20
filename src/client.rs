//! Enhancement client: one remote super-resolution call per attempt.
//!
//! The client builds the fixed-shape provider payload, awaits exactly one
//! response, and classifies it. Inference-path errors (network, auth,
//! provider) are never propagated: the caller always gets a displayable
//! artifact back, at worst the original image. No retries, no streaming,
//! no client-side timeout — a provider hang is indistinguishable from a
//! long-running enhancement and is accepted as such.

use crate::codec::EncodedPayload;
use crate::error::ConfigError;
use serde_json::{json, Value};
use std::env;
use std::time::Instant;

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_SCALE: u32 = 4;

/// Provider endpoint, model identifier, and credential.
///
/// Resolved once at startup; a missing value is a configuration error, not a
/// per-request failure.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_base: String,
    pub token: String,
    pub model: String,
}

impl ProviderConfig {
    /// Read `SCALIFY_API_TOKEN`, `SCALIFY_MODEL`, and the optional
    /// `SCALIFY_API_BASE` override from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = read_env("SCALIFY_API_TOKEN").ok_or(ConfigError::MissingToken)?;
        let model = read_env("SCALIFY_MODEL").ok_or(ConfigError::MissingModel)?;
        let api_base =
            read_env("SCALIFY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self {
            api_base,
            token,
            model,
        })
    }

    pub fn predictions_url(&self) -> String {
        format!(
            "{}/models/{}/predictions",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

fn read_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// One enhancement request. Constructed fresh per attempt and never reused.
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    pub payload: EncodedPayload,
    pub scale: u32,
    pub face_enhance: bool,
}

/// Outcome of a remote enhancement.
///
/// `Success` and `Fallback` always carry a non-empty displayable reference;
/// `Failure` exists for the defensive case where not even the original image
/// is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementResult {
    Success { artifact_ref: String },
    Fallback { artifact_ref: String },
    Failure { reason: String },
}

impl EnhancementResult {
    pub fn artifact_ref(&self) -> Option<&str> {
        match self {
            Self::Success { artifact_ref } | Self::Fallback { artifact_ref } => {
                Some(artifact_ref.as_str())
            }
            Self::Failure { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Fallback { .. } => "fallback",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Seam between the workflow and the remote provider.
///
/// `submit` must classify every outcome itself; it never returns a hard
/// error to the workflow.
pub trait Upscaler {
    fn submit(&self, request: &EnhancementRequest, original_ref: &str) -> EnhancementResult;
}

/// Production `Upscaler` backed by a single blocking HTTP call.
pub struct EnhanceClient {
    config: ProviderConfig,
}

impl EnhanceClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl Upscaler for EnhanceClient {
    fn submit(&self, request: &EnhancementRequest, original_ref: &str) -> EnhancementResult {
        let body = json!({
            "input": {
                "image": request.payload.as_str(),
                "scale": request.scale,
                "face_enhance": request.face_enhance,
            }
        });

        let url = self.config.predictions_url();
        let start = Instant::now();
        let response = ureq::post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Prefer", "wait")
            .send_json(body);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(mut response) => {
                tracing::info!(
                    elapsed_ms,
                    status = response.status().as_u16(),
                    "inference call complete"
                );
                match response.body_mut().read_json::<Value>() {
                    Ok(value) => classify_response(&value, original_ref),
                    Err(err) => {
                        tracing::warn!(error = %err, "inference response unreadable, keeping original");
                        fallback(original_ref)
                    }
                }
            }
            Err(err) => {
                tracing::warn!(elapsed_ms, error = %err, "inference call failed, keeping original");
                fallback(original_ref)
            }
        }
    }
}

/// Classify a provider response per the fixed contract: a non-empty string
/// `output` is the enhanced artifact; everything else keeps the original.
pub(crate) fn classify_response(value: &Value, original_ref: &str) -> EnhancementResult {
    match value.get("output") {
        Some(Value::String(artifact)) if !artifact.trim().is_empty() => {
            EnhancementResult::Success {
                artifact_ref: artifact.trim().to_string(),
            }
        }
        Some(other) => {
            tracing::warn!(
                output_kind = json_kind(other),
                "unexpected inference output shape, keeping original"
            );
            fallback(original_ref)
        }
        None => {
            tracing::warn!("inference response missing output, keeping original");
            fallback(original_ref)
        }
    }
}

fn fallback(original_ref: &str) -> EnhancementResult {
    if original_ref.is_empty() {
        // Defensive: the workflow always supplies the original display ref.
        return EnhancementResult::Failure {
            reason: "no original image available for fallback".to_string(),
        };
    }
    EnhancementResult::Fallback {
        artifact_ref: original_ref.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
