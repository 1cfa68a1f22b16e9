// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::relay::{GenerateImageResponse, RelayOptions};
use crate::utils::logging::truncate;
use crate::validation::validate_prompt;
use crate::vision::MAX_REFERENCE_IMAGES;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Without a credential every generation fails, so report it
    let credential_check = if state.api_key.is_some() {
        HealthCheck {
            status: "ok".to_string(),
            message: "Upstream API key configured".to_string(),
        }
    } else {
        overall_status = HealthStatus::Unhealthy;
        HealthCheck {
            status: "error".to_string(),
            message: format!(
                "Upstream API key missing (set {})",
                state.config.upstream.api_key_env
            ),
        }
    };
    checks.insert("credential".to_string(), credential_check);

    checks.insert(
        "upstream".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!(
                "API base: {}, model: {}",
                state.upstream.base_url(),
                state.upstream.model()
            ),
        },
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for `POST /generate-image`.
///
/// The body is taken as raw bytes so that every failure, including an
/// unreadable or oversized body, answers with a classified JSON error.
pub async fn generate_image_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let result = generate_image(&state, body).await;
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(answer) => {
            metrics::record_relay_request(StatusCode::OK.as_u16(), "OK", elapsed);
            Json(answer).into_response()
        }
        Err(e) => {
            let (status, code, _) = e.parts();
            metrics::record_relay_request(status.as_u16(), code.as_str(), elapsed);
            e.into_response()
        }
    }
}

async fn generate_image(
    state: &AppState,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<GenerateImageResponse> {
    let api_key = state.api_key.as_deref().ok_or(RelayError::ApiKeyMissing)?;

    let body = body.map_err(body_rejection)?;
    debug!(
        "Raw request (truncated): {}",
        truncate(&String::from_utf8_lossy(&body), 300)
    );

    let request: Value = serde_json::from_slice(&body).map_err(RelayError::InvalidFormat)?;

    let prompt = request
        .get("prompt")
        .and_then(Value::as_str)
        .ok_or_else(|| RelayError::Validation("Prompt is required and must be a string".to_string()))?;

    validate_prompt(prompt).map_err(|e| RelayError::Validation(e.message().to_string()))?;

    let options = parse_options(request.get("options"))?;

    info!(
        "Received generate request: prompt_chars={}, references={}, aspect_ratio={}",
        prompt.chars().count(),
        options.reference_images.len(),
        options.aspect_ratio
    );

    let image_url = state
        .upstream
        .generate_image(
            api_key,
            prompt,
            &options.reference_images,
            options.aspect_ratio,
        )
        .await?;

    Ok(GenerateImageResponse {
        image_url: Some(image_url),
    })
}

fn body_rejection(rejection: BytesRejection) -> RelayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::Validation("Request body too large".to_string())
    } else {
        RelayError::Internal(rejection.body_text())
    }
}

fn parse_options(raw: Option<&Value>) -> Result<RelayOptions> {
    let options: RelayOptions = match raw {
        None | Some(Value::Null) => RelayOptions::default(),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| RelayError::Validation(format!("Invalid options: {}", e)))?,
    };

    if options.reference_images.len() > MAX_REFERENCE_IMAGES {
        return Err(RelayError::Validation(format!(
            "Too many reference images ({}/{})",
            options.reference_images.len(),
            MAX_REFERENCE_IMAGES
        )));
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_options_defaults() {
        let options = parse_options(None).unwrap();
        assert!(options.reference_images.is_empty());
        assert_eq!(parse_options(Some(&Value::Null)).unwrap(), options);
    }

    #[test]
    fn test_parse_options_rejects_unknown_keys() {
        let err = parse_options(Some(&json!({"mood": "happy"}))).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn test_parse_options_rejects_too_many_images() {
        let images = vec!["QUJD"; 6];
        let err = parse_options(Some(&json!({"referenceImages": images}))).unwrap_err();
        assert_eq!(err.to_string(), "Too many reference images (6/5)");
    }
}
