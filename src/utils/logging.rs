//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to prevent
//! sensitive data (like API keys) from leaking into logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{RelayError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| RelayError::Internal(format!("Invalid log level '{}': {}", config.level, e)))?;

    let result = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| RelayError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Secret prefixes and the placeholder each one is replaced with.
const SECRET_PATTERNS: [(&str, &str); 2] = [
    // OpenAI API keys: "sk-..." and project keys "sk-proj-..."
    ("sk-", "[REDACTED_API_KEY]"),
    // Bearer tokens in echoed headers
    ("Bearer ", "Bearer [REDACTED_TOKEN]"),
];

/// Sanitizes sensitive information from log messages.
///
/// Every occurrence of a known secret pattern is replaced, up to the next
/// whitespace, quote or comma.
pub fn sanitize(input: &str) -> String {
    let mut result = input.to_string();

    for (prefix, placeholder) in SECRET_PATTERNS {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].find(prefix) {
            let start = search_from + offset;
            let token_start = start + prefix.len();
            let end = result[token_start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
                .map(|i| token_start + i)
                .unwrap_or(result.len());

            let mid_word = result[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
            if mid_word || end == token_start {
                // "task-list", or a bare prefix with nothing behind it
                search_from = token_start;
                continue;
            }

            result.replace_range(start..end, placeholder);
            search_from = start + placeholder.len();
        }
    }

    result
}

/// Shorten long bodies (e.g. base64 images) for debug logging.
pub fn truncate(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let head: String = input.chars().take(max_chars).collect();
        format!("{}... ({} chars total)", head, input.chars().count())
    }
}
