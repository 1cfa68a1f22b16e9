//! Client-side error taxonomy.
//!
//! Every failure the generation flow can surface is an [`AppError`]: an
//! immutable value carrying a [`ErrorKind`], a short message, optional
//! details, and an optional [`ErrorCode`] used to pick a precise
//! user-facing message.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use super::classify::{classify_message, code_for_status, ErrorCode};
use std::fmt;
use thiserror::Error;

/// Broad category of a client-side failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Validation,
    Api,
    File,
    Generation,
    Unknown,
}

impl ErrorKind {
    /// Only transport and upstream failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Api)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
            ErrorKind::Api => "api",
            ErrorKind::File => "file",
            ErrorKind::Generation => "generation",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure, constructed once at the failure site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Option<String>,
    retryable: bool,
    code: Option<ErrorCode>,
}

impl AppError {
    /// Create an error; `retryable` is derived from the kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            retryable: kind.is_retryable(),
            code: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::File, message)
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generation, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Generic message keyed on the kind alone.
    pub fn error_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Network connection issue. Please check your internet connection and try again."
                    .to_string()
            }
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::Api => format!("API Error: {}", self.message),
            ErrorKind::File => format!("File Error: {}", self.message),
            ErrorKind::Generation => format!("Generation Error: {}", self.message),
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// Message for display. A recognized code wins over the kind-keyed fallback.
    pub fn user_friendly_message(&self) -> String {
        let friendly = match self.code {
            Some(ErrorCode::FileTooLarge) => "File size is too large. Please use files under 5MB.",
            Some(ErrorCode::InvalidFileType) => {
                "Invalid file type. Please use PNG, JPG, or WebP images."
            }
            Some(ErrorCode::NetworkTimeout) => "Request timed out. Please try again.",
            Some(ErrorCode::RateLimited) => "Too many requests. Please wait a moment and try again.",
            Some(ErrorCode::OpenAiApiKeyMissing) => {
                "OpenAI API key is not configured. Please contact support."
            }
            Some(ErrorCode::QuotaExceeded) => "API quota exceeded. Please try again later.",
            _ => return self.error_message(),
        };
        friendly.to_string()
    }

    /// Classify a failed relay exchange.
    ///
    /// The structured code from the relay body is trusted first, then the
    /// HTTP status, and only then keywords in the message.
    pub fn from_relay_failure(status: Option<u16>, code: Option<&str>, message: &str) -> Self {
        let classified = code
            .and_then(ErrorCode::parse)
            .or_else(|| status.and_then(code_for_status))
            .or_else(|| classify_message(message));

        let error = match classified {
            Some(ErrorCode::QuotaExceeded) => {
                AppError::api("API quota exceeded").with_code(ErrorCode::QuotaExceeded)
            }
            Some(ErrorCode::RateLimited) => {
                AppError::api("Rate limit exceeded").with_code(ErrorCode::RateLimited)
            }
            Some(ErrorCode::OpenAiApiKeyMissing | ErrorCode::OpenAiApiKeyInvalid) => {
                AppError::api("API key issue").with_code(ErrorCode::OpenAiApiKeyMissing)
            }
            Some(ErrorCode::Timeout | ErrorCode::NetworkTimeout) => {
                AppError::api("Request timed out").with_code(ErrorCode::NetworkTimeout)
            }
            Some(other) => AppError::api(api_message(message)).with_code(other),
            None => AppError::api(api_message(message)),
        };
        error.with_details(message)
    }
}

fn api_message(message: &str) -> String {
    if message.trim().is_empty() {
        "API error".to_string()
    } else {
        message.to_string()
    }
}
