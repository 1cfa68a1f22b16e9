// Generated image result and download
// Author: kelexine (https://github.com/kelexine)

use super::models::{decode_base64, split_data_uri};
use crate::error::AppError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The image produced by a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    image_url: String,
}

impl GeneratedImage {
    /// `image_url` is an http(s) URL or a base64 `data:` URI.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn is_data_uri(&self) -> bool {
        self.image_url.starts_with("data:")
    }

    /// Raw image bytes, fetching remote URLs with `http_client`.
    pub async fn bytes(&self, http_client: &Client) -> Result<Vec<u8>, AppError> {
        if self.is_data_uri() {
            let (_, payload) = split_data_uri(&self.image_url)
                .ok_or_else(|| AppError::generation("Invalid image data"))?;
            return decode_base64(payload).map_err(|e| {
                AppError::generation("Invalid image data").with_details(e.to_string())
            });
        }

        debug!("Fetching generated image from {}", self.image_url);
        let response = http_client
            .get(&self.image_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::network("Failed to download image").with_details(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::network("Failed to download image").with_details(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Save into `dir` as `ai-generated-image-<unix-ms>.png`.
    pub async fn download(&self, dir: &Path, http_client: &Client) -> Result<PathBuf, AppError> {
        let bytes = self.bytes(http_client).await?;
        let path = dir.join(download_file_name(chrono::Utc::now().timestamp_millis()));

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            AppError::file("Failed to save image").with_details(format!("{}: {}", path.display(), e))
        })?;

        info!("Saved generated image to {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

pub fn download_file_name(timestamp_millis: i64) -> String {
    format!("ai-generated-image-{}.png", timestamp_millis)
}
