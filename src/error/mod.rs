// Error types for the promptcraft relay and client
// Author: kelexine (https://github.com/kelexine)

mod classify;
mod taxonomy;

pub use classify::{classify_message, code_for_status, ErrorCode};
pub use taxonomy::{AppError, ErrorKind};

use crate::models::relay::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("OpenAI API key not configured")]
    ApiKeyMissing,

    #[error("Invalid JSON in request body")]
    InvalidFormat(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Invalid API key. Please check your OpenAI API key configuration.")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("API quota exceeded. Please try again later.")]
    QuotaExceeded,

    #[error("Invalid request. Please check your prompt and try again.")]
    UpstreamBadRequest,

    #[error("OpenAI service is temporarily unavailable. Please try again later.")]
    UpstreamUnavailable,

    #[error("OpenAI service is overloaded. Please try again in a few minutes.")]
    UpstreamOverloaded,

    #[error("OpenAI API error: {0}")]
    UpstreamApi(String),

    #[error("No image was generated in the response")]
    NoImage,

    #[error("Invalid image data received from OpenAI API")]
    InvalidImageData,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    /// Map a non-2xx upstream answer to a relay failure.
    ///
    /// `upstream_code` and `upstream_message` come from the upstream error
    /// envelope when it could be parsed.
    pub fn from_upstream_status(
        status: u16,
        upstream_code: Option<&str>,
        upstream_message: &str,
    ) -> Self {
        match status {
            401 => RelayError::InvalidApiKey,
            429 => {
                let quota = upstream_code.is_some_and(|c| c.contains("quota"))
                    || classify_message(upstream_message) == Some(ErrorCode::QuotaExceeded);
                if quota {
                    RelayError::QuotaExceeded
                } else {
                    RelayError::RateLimited
                }
            }
            400 => RelayError::UpstreamBadRequest,
            500 => RelayError::UpstreamUnavailable,
            503 => RelayError::UpstreamOverloaded,
            _ => RelayError::UpstreamApi(if upstream_message.is_empty() {
                "Unknown error".to_string()
            } else {
                upstream_message.to_string()
            }),
        }
    }

    /// The wire code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::ApiKeyMissing => ErrorCode::OpenAiApiKeyMissing,
            RelayError::InvalidFormat(_) => ErrorCode::InvalidRequestFormat,
            RelayError::Validation(_) => ErrorCode::ValidationError,
            RelayError::Timeout => ErrorCode::Timeout,
            RelayError::InvalidApiKey => ErrorCode::OpenAiApiKeyInvalid,
            RelayError::RateLimited => ErrorCode::RateLimited,
            RelayError::QuotaExceeded => ErrorCode::QuotaExceeded,
            RelayError::UpstreamBadRequest => ErrorCode::InvalidRequest,
            RelayError::UpstreamUnavailable => ErrorCode::ServiceUnavailable,
            RelayError::UpstreamOverloaded => ErrorCode::ServiceOverloaded,
            RelayError::UpstreamApi(_) => ErrorCode::ApiError,
            RelayError::NoImage | RelayError::InvalidImageData => ErrorCode::GenerationFailed,
            RelayError::Http(e) if e.is_timeout() => ErrorCode::Timeout,
            RelayError::Http(_)
            | RelayError::ConfigParsing(_)
            | RelayError::Internal(_) => {
                classify_message(&self.to_string()).unwrap_or(ErrorCode::UnknownError)
            }
        }
    }

    /// Status, code and message exactly as the relay will answer.
    pub fn parts(&self) -> (StatusCode, ErrorCode, String) {
        let code = self.code();
        let message = match self {
            // Unclassified failures that matched a keyword get the canonical wording
            RelayError::Http(_)
            | RelayError::ConfigParsing(_)
            | RelayError::Internal(_) => match code {
                ErrorCode::QuotaExceeded => RelayError::QuotaExceeded.to_string(),
                ErrorCode::RateLimited => RelayError::RateLimited.to_string(),
                ErrorCode::OpenAiApiKeyInvalid => {
                    "API key issue. Please check your configuration.".to_string()
                }
                ErrorCode::Timeout => RelayError::Timeout.to_string(),
                _ => self.to_string(),
            },
            _ => self.to_string(),
        };
        let status = StatusCode::from_u16(code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, code, message)
    }
}

// Convert RelayError to HTTP responses for Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        error!("Relay error ({}): {} [{}]", status.as_u16(), message, code);

        let body = ErrorBody {
            error: message,
            code: Some(code.as_str().to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
