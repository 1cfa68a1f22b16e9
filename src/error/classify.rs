// Failure classification shared by the relay and the client
// Author: kelexine (https://github.com/kelexine)

use std::fmt;

/// Machine-readable failure codes emitted by the relay or raised client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    FileTooLarge,
    InvalidFileType,
    NetworkTimeout,
    RateLimited,
    OpenAiApiKeyMissing,
    OpenAiApiKeyInvalid,
    QuotaExceeded,
    InvalidRequestFormat,
    ValidationError,
    Timeout,
    InvalidRequest,
    ServiceUnavailable,
    ServiceOverloaded,
    ApiError,
    GenerationFailed,
    UnknownError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 16] = [
        ErrorCode::FileTooLarge,
        ErrorCode::InvalidFileType,
        ErrorCode::NetworkTimeout,
        ErrorCode::RateLimited,
        ErrorCode::OpenAiApiKeyMissing,
        ErrorCode::OpenAiApiKeyInvalid,
        ErrorCode::QuotaExceeded,
        ErrorCode::InvalidRequestFormat,
        ErrorCode::ValidationError,
        ErrorCode::Timeout,
        ErrorCode::InvalidRequest,
        ErrorCode::ServiceUnavailable,
        ErrorCode::ServiceOverloaded,
        ErrorCode::ApiError,
        ErrorCode::GenerationFailed,
        ErrorCode::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::NetworkTimeout => "NETWORK_TIMEOUT",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::OpenAiApiKeyMissing => "OPENAI_API_KEY_MISSING",
            ErrorCode::OpenAiApiKeyInvalid => "OPENAI_API_KEY_INVALID",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::InvalidRequestFormat => "INVALID_REQUEST_FORMAT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::ServiceOverloaded => "SERVICE_OVERLOADED",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Parse a wire code. Unrecognized codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == code)
    }

    /// HTTP status the relay answers with when it fails with this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::FileTooLarge
            | ErrorCode::InvalidFileType
            | ErrorCode::InvalidRequestFormat
            | ErrorCode::ValidationError
            | ErrorCode::InvalidRequest => 400,
            ErrorCode::OpenAiApiKeyInvalid => 401,
            ErrorCode::Timeout | ErrorCode::NetworkTimeout => 408,
            ErrorCode::RateLimited | ErrorCode::QuotaExceeded => 429,
            ErrorCode::ServiceOverloaded => 503,
            ErrorCode::OpenAiApiKeyMissing
            | ErrorCode::ServiceUnavailable
            | ErrorCode::ApiError
            | ErrorCode::GenerationFailed
            | ErrorCode::UnknownError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an HTTP status on its own to a code, when the status is specific enough.
pub fn code_for_status(status: u16) -> Option<ErrorCode> {
    match status {
        401 => Some(ErrorCode::OpenAiApiKeyInvalid),
        408 | 504 => Some(ErrorCode::Timeout),
        429 => Some(ErrorCode::RateLimited),
        503 => Some(ErrorCode::ServiceOverloaded),
        _ => None,
    }
}

/// Last-resort classification by keywords in a free-form error message.
///
/// Matching is on words, case-insensitive, so "generated" does not read as
/// a rate limit and "keyboard" does not read as a credential issue. Plural
/// and run-together forms ("keys", "api_keys", "ratelimited") still count.
/// Precedence: quota, rate, key, timeout.
pub fn classify_message(message: &str) -> Option<ErrorCode> {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has = |pred: fn(&str) -> bool| words.iter().any(|w| pred(*w));

    if has(|w| w.starts_with("quota")) {
        Some(ErrorCode::QuotaExceeded)
    } else if has(|w| matches!(w, "rate" | "rates") || w.starts_with("ratelimit")) {
        Some(ErrorCode::RateLimited)
    } else if has(|w| matches!(w, "key" | "keys" | "apikey" | "apikeys")) {
        Some(ErrorCode::OpenAiApiKeyInvalid)
    } else if has(|w| w == "timeout" || w == "timedout") || lowered.contains("timed out") {
        Some(ErrorCode::Timeout)
    } else {
        None
    }
}
