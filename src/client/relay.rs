// HTTP client for the image relay
// Author: kelexine (https://github.com/kelexine)

use super::{ImageRelay, Session};
use crate::config::ClientConfig;
use crate::error::{AppError, ErrorCode};
use crate::models::relay::{ErrorBody, GenerateImageRequest, GenerateImageResponse, RelayOptions};
use crate::utils::logging::{sanitize, truncate};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Talks to `POST /generate-image` over HTTP.
///
/// The session credential, when present, goes out as both the `apikey`
/// header and a bearer token.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http_client: Client,
    relay_url: String,
    session: Session,
}

impl RelayClient {
    pub fn new(
        relay_url: impl Into<String>,
        request_timeout: Duration,
        session: Session,
    ) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::unknown("Failed to create HTTP client").with_details(e.to_string()))?;

        Ok(Self {
            http_client,
            relay_url: relay_url.into(),
            session,
        })
    }

    pub fn from_config(config: &ClientConfig, session: Session) -> Result<Self, AppError> {
        Self::new(
            config.relay_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
            session,
        )
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }

    /// The underlying HTTP client, reused for downloading results.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }
}

#[async_trait]
impl ImageRelay for RelayClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &RelayOptions,
    ) -> Result<GenerateImageResponse, AppError> {
        let body = GenerateImageRequest {
            prompt: prompt.to_string(),
            options: options.clone(),
        };

        let mut request = self.http_client.post(&self.relay_url).json(&body);
        if let Some(token) = self.session.token() {
            request = request
                .header("apikey", token.as_str())
                .bearer_auth(token.as_str());
        }

        debug!("Calling relay at {}", self.relay_url);

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(
                "Relay returned {}: {}",
                status.as_u16(),
                sanitize(&truncate(&text, 300))
            );
            let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (body.code, body.error),
                Err(_) => (None, text),
            };
            return Err(AppError::from_relay_failure(
                Some(status.as_u16()),
                code.as_deref(),
                &message,
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            AppError::api("Invalid response from image relay").with_details(e.to_string())
        })
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::network("Request timed out")
            .with_code(ErrorCode::NetworkTimeout)
            .with_details(e.to_string())
    } else {
        AppError::network("Failed to reach the image relay").with_details(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard, session: Session) -> RelayClient {
        RelayClient::new(
            format!("{}/generate-image", server.url()),
            Duration::from_secs(5),
            session,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_session_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate-image")
            .match_header("apikey", "user-key")
            .match_header("authorization", "Bearer user-key")
            .match_body(mockito::Matcher::PartialJson(json!({"prompt": "a cat"})))
            .with_status(200)
            .with_body(json!({"imageUrl": "data:image/png;base64,QUJD"}).to_string())
            .create_async()
            .await;

        let session = Session::new();
        session.login("user-key").unwrap();
        let client = client_for(&server, session);

        let answer = client.generate("a cat", &RelayOptions::default()).await.unwrap();
        assert_eq!(answer.image_url.as_deref(), Some("data:image/png;base64,QUJD"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate-image")
            .with_status(429)
            .with_body(
                json!({
                    "error": "Rate limit exceeded. Please try again later.",
                    "code": "RATE_LIMITED",
                    "timestamp": "2026-01-01T00:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, Session::new());
        let err = client.generate("a cat", &RelayOptions::default()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.code(), Some(ErrorCode::RateLimited));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_keywords() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/generate-image")
            .with_status(502)
            .with_body("quota exhausted upstream")
            .create_async()
            .await;

        let client = client_for(&server, Session::new());
        let err = client.generate("a cat", &RelayOptions::default()).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::QuotaExceeded));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_network_error() {
        let client = RelayClient::new(
            "http://127.0.0.1:9/generate-image",
            Duration::from_secs(2),
            Session::new(),
        )
        .unwrap();

        let err = client.generate("a cat", &RelayOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
