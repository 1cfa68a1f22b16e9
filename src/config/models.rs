//! Configuration data structures for promptcraft.
//!
//! This module defines the schema for the application settings: the relay
//! server, its upstream image-generation API, the generation client, and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings for the relay.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream image-generation API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Settings for the generation client talking to the relay.
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8787`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body. Five base64 reference images of 5 MiB
    /// each come to roughly 34 MiB.
    /// Default: 50 MiB
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Settings for the upstream Responses API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL; `/responses` is appended.
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model driving the image-generation tool.
    /// Default: `gpt-4.1-mini`
    #[serde(default = "default_model")]
    pub model: String,

    /// Hard limit on one upstream exchange, in seconds.
    /// Default: `60`
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u64,

    /// Environment variable holding the upstream credential.
    /// Default: `OPENAI_API_KEY`
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Settings for the generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the relay's generate endpoint.
    /// Default: `http://127.0.0.1:8787/generate-image`
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Attempts per generation, including the first.
    /// Default: `3`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles for each one after.
    /// Default: `1000`
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Per-request timeout towards the relay, in seconds. Kept above the
    /// relay's own upstream timeout so the relay's 408 arrives first.
    /// Default: `90`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            timeout_seconds: default_upstream_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_upstream_timeout() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_relay_url() -> String {
    "http://127.0.0.1:8787/generate-image".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
