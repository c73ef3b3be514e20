use super::{classify_response, EnhancementResult, ProviderConfig, DEFAULT_API_BASE};
use serde_json::json;

const ORIGINAL: &str = "data:image/jpeg;base64,b3JpZ2luYWw=";

#[test]
fn string_output_is_success() {
    let response = json!({ "output": "https://cdn.example.com/enhanced.jpg" });
    assert_eq!(
        classify_response(&response, ORIGINAL),
        EnhancementResult::Success {
            artifact_ref: "https://cdn.example.com/enhanced.jpg".to_string()
        }
    );
}

#[test]
fn string_output_is_trimmed() {
    let response = json!({ "output": "  https://cdn.example.com/enhanced.jpg\n" });
    match classify_response(&response, ORIGINAL) {
        EnhancementResult::Success { artifact_ref } => {
            assert_eq!(artifact_ref, "https://cdn.example.com/enhanced.jpg");
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn empty_output_falls_back_to_original() {
    let response = json!({ "output": "" });
    assert_eq!(
        classify_response(&response, ORIGINAL),
        EnhancementResult::Fallback {
            artifact_ref: ORIGINAL.to_string()
        }
    );
}

#[test]
fn non_string_output_falls_back_to_original() {
    for response in [
        json!({ "output": ["https://cdn.example.com/enhanced.jpg"] }),
        json!({ "output": 42 }),
        json!({ "output": null }),
        json!({ "output": { "url": "https://cdn.example.com/enhanced.jpg" } }),
    ] {
        assert_eq!(
            classify_response(&response, ORIGINAL),
            EnhancementResult::Fallback {
                artifact_ref: ORIGINAL.to_string()
            }
        );
    }
}

#[test]
fn missing_output_falls_back_to_original() {
    let response = json!({ "status": "failed", "error": "NSFW content detected" });
    assert_eq!(
        classify_response(&response, ORIGINAL),
        EnhancementResult::Fallback {
            artifact_ref: ORIGINAL.to_string()
        }
    );
}

#[test]
fn fallback_without_original_is_failure() {
    let response = json!({ "output": null });
    match classify_response(&response, "") {
        EnhancementResult::Failure { reason } => {
            assert!(reason.contains("no original image"), "reason: {reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn artifact_ref_is_present_unless_failure() {
    let success = EnhancementResult::Success {
        artifact_ref: "https://cdn.example.com/out.jpg".to_string(),
    };
    let fallback = EnhancementResult::Fallback {
        artifact_ref: ORIGINAL.to_string(),
    };
    let failure = EnhancementResult::Failure {
        reason: "nothing to show".to_string(),
    };

    assert_eq!(success.artifact_ref(), Some("https://cdn.example.com/out.jpg"));
    assert_eq!(fallback.artifact_ref(), Some(ORIGINAL));
    assert_eq!(failure.artifact_ref(), None);
    assert_eq!(success.label(), "success");
    assert_eq!(fallback.label(), "fallback");
    assert_eq!(failure.label(), "failure");
}

#[test]
fn predictions_url_joins_base_and_model() {
    let config = ProviderConfig {
        api_base: "https://api.replicate.com/v1/".to_string(),
        token: "t".to_string(),
        model: "owner/magic-image-refiner".to_string(),
    };
    assert_eq!(
        config.predictions_url(),
        "https://api.replicate.com/v1/models/owner/magic-image-refiner/predictions"
    );
    assert!(DEFAULT_API_BASE.starts_with("https://"));
}
