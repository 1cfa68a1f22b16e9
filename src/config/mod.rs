// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{RelayError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables
    /// 3. Config file
    /// 4. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_path())
    }

    /// Same as [`load`](Self::load) with an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(path).required(false))
            // Override with environment variables, e.g. PROMPTCRAFT__SERVER__PORT
            .add_source(
                Environment::with_prefix("PROMPTCRAFT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| RelayError::Internal(format!("Configuration error: {}", e)))?;

        config
            .try_deserialize()
            .map_err(|e| RelayError::Internal(format!("Configuration error: {}", e)))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promptcraft")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.upstream.timeout_seconds, 60);
        assert_eq!(config.upstream.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.client.max_attempts, 3);
        assert_eq!(config.client.initial_delay_ms, 1000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9999\n\n[upstream]\nmodel = \"gpt-4.1\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.upstream.model, "gpt-4.1");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_file_is_fine() {
        let config = AppConfig::load_from("/nonexistent/promptcraft/config.toml").unwrap();
        assert_eq!(config.client.relay_url, "http://127.0.0.1:8787/generate-image");
    }
}
