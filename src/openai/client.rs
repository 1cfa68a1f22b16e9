// OpenAI Responses API client for image generation
// Author: kelexine (https://github.com/kelexine)

use crate::config::UpstreamConfig;
use crate::credential::Credential;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::openai::{
    ApiErrorEnvelope, InputContent, InputMessage, ResponsesRequest, ResponsesResponse, Tool,
    IMAGE_GENERATION_CALL,
};
use crate::prompt::AspectRatio;
use crate::utils::logging::{sanitize, truncate};
use crate::validation::validate_file;
use crate::vision::models::{data_uri, decode_base64, ImageFormat};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Label used for reference images whose bytes match no known signature.
const FALLBACK_REFERENCE_MIME: &str = "image/jpeg";

/// Client for the upstream Responses API.
///
/// One call is one exchange: no retries here, the generation client owns
/// retrying. Every exchange is bounded by a hard timeout.
pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        // The overall deadline is enforced around the whole exchange, not here
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created upstream HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate one image and return it as a `data:image/png;base64,` URI.
    ///
    /// `reference_images` are base64 payloads without a data-URI header, in
    /// the order they should appear after the prompt.
    pub async fn generate_image(
        &self,
        api_key: &Credential,
        prompt: &str,
        reference_images: &[String],
        aspect_ratio: AspectRatio,
    ) -> Result<String> {
        let image_uris = reference_images
            .iter()
            .enumerate()
            .map(|(i, payload)| {
                reference_data_uri(payload).map_err(|e| match e {
                    RelayError::Validation(msg) => {
                        RelayError::Validation(format!("Reference image {}: {}", i + 1, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let request = build_request(&self.model, prompt, image_uris, aspect_ratio);

        info!(
            "Generating image: model={}, references={}, size={}",
            self.model,
            reference_images.len(),
            aspect_ratio.upstream_size()
        );

        let start = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.exchange(api_key, &request)).await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(Ok(response)) => {
                metrics::record_upstream_call("success", elapsed);
                let payload = extract_image(&response)?;
                Ok(data_uri("image/png", &payload))
            }
            Ok(Err(e)) => {
                metrics::record_upstream_call("error", elapsed);
                Err(e)
            }
            Err(_) => {
                metrics::record_upstream_call("timeout", elapsed);
                warn!("Upstream call aborted after {}s", self.timeout.as_secs());
                Err(RelayError::Timeout)
            }
        }
    }

    async fn exchange(
        &self,
        api_key: &Credential,
        request: &ResponsesRequest,
    ) -> Result<ResponsesResponse> {
        let url = format!("{}/responses", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                "Upstream returned {}: {}",
                status.as_u16(),
                sanitize(&truncate(&body, 500))
            );
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error);
            let code = detail.as_ref().and_then(|d| d.code.clone());
            let message = detail
                .and_then(|d| d.message)
                .unwrap_or_else(|| body.clone());
            return Err(RelayError::from_upstream_status(
                status.as_u16(),
                code.as_deref(),
                &message,
            ));
        }

        debug!("Upstream response: {}", truncate(&body, 300));

        serde_json::from_str(&body)
            .map_err(|e| RelayError::UpstreamApi(format!("Unreadable response: {}", e)))
    }
}

/// Build the upstream payload: the prompt as a text part, then one image
/// part per reference, then the image-generation tool.
pub fn build_request(
    model: &str,
    prompt: &str,
    image_uris: Vec<String>,
    aspect_ratio: AspectRatio,
) -> ResponsesRequest {
    let mut content = Vec::with_capacity(image_uris.len() + 1);
    content.push(InputContent::InputText {
        text: prompt.to_string(),
    });
    content.extend(
        image_uris
            .into_iter()
            .map(|image_url| InputContent::InputImage { image_url }),
    );

    ResponsesRequest {
        model: model.to_string(),
        input: vec![InputMessage {
            role: "user".to_string(),
            content,
        }],
        tools: vec![Tool::ImageGeneration {
            size: Some(aspect_ratio.upstream_size().to_string()),
        }],
    }
}

/// Turn a base64 reference payload into a data URI labelled with its
/// sniffed MIME type.
pub fn reference_data_uri(payload: &str) -> Result<String> {
    let payload = payload.trim();
    let bytes = decode_base64(payload)
        .map_err(|_| RelayError::Validation("Invalid base64 image data".to_string()))?;

    let mime_type = ImageFormat::detect(&bytes)
        .map(|f| f.mime_type())
        .unwrap_or(FALLBACK_REFERENCE_MIME);

    validate_file(bytes.len() as u64, mime_type)
        .map_err(|e| RelayError::Validation(e.message().to_string()))?;

    Ok(data_uri(mime_type, payload))
}

/// Find the image-generation output and return its base64 payload.
pub fn extract_image(response: &ResponsesResponse) -> Result<String> {
    let item = response
        .output
        .iter()
        .find(|item| item.item_type == IMAGE_GENERATION_CALL)
        .ok_or(RelayError::NoImage)?;

    match &item.result {
        Some(Value::String(payload)) if !payload.is_empty() => Ok(payload.clone()),
        _ => Err(RelayError::InvalidImageData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::vision::models::encode_base64;
    use serde_json::json;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn client_for(server: &mockito::ServerGuard, timeout_seconds: u64) -> OpenAiClient {
        OpenAiClient::new(&UpstreamConfig {
            api_base_url: server.url(),
            timeout_seconds,
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    fn key() -> Credential {
        Credential::new("sk-test").unwrap()
    }

    #[test]
    fn test_build_request_keeps_reference_order() {
        let request = build_request(
            "gpt-4.1-mini",
            "a cat",
            vec!["data:image/png;base64,AAA".into(), "data:image/jpeg;base64,BBB".into()],
            AspectRatio::Landscape,
        );
        let value = serde_json::to_value(&request).unwrap();
        let content = &value["input"][0]["content"];
        assert_eq!(content[0], json!({"type": "input_text", "text": "a cat"}));
        assert_eq!(content[1]["image_url"], "data:image/png;base64,AAA");
        assert_eq!(content[2]["image_url"], "data:image/jpeg;base64,BBB");
        assert_eq!(value["tools"][0], json!({"type": "image_generation", "size": "1536x1024"}));
    }

    #[test]
    fn test_reference_data_uri_sniffs_format() {
        let png = encode_base64(&PNG_HEADER);
        assert!(reference_data_uri(&png).unwrap().starts_with("data:image/png;base64,"));

        let unknown = encode_base64(b"not an image");
        assert!(reference_data_uri(&unknown).unwrap().starts_with("data:image/jpeg;base64,"));

        assert!(matches!(
            reference_data_uri("%%%not base64%%%"),
            Err(RelayError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_image() {
        let ok: ResponsesResponse = serde_json::from_value(json!({
            "output": [
                {"type": "message", "content": []},
                {"type": "image_generation_call", "result": "iVBORw0KGgo="}
            ]
        }))
        .unwrap();
        assert_eq!(extract_image(&ok).unwrap(), "iVBORw0KGgo=");

        let missing: ResponsesResponse =
            serde_json::from_value(json!({"output": [{"type": "message"}]})).unwrap();
        assert!(matches!(extract_image(&missing), Err(RelayError::NoImage)));

        let bad: ResponsesResponse = serde_json::from_value(json!({
            "output": [{"type": "image_generation_call", "result": 42}]
        }))
        .unwrap();
        assert!(matches!(extract_image(&bad), Err(RelayError::InvalidImageData)));
    }

    #[tokio::test]
    async fn test_generate_image_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/responses")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"output": [{"type": "image_generation_call", "result": "QUJD"}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, 60);
        let url = client
            .generate_image(&key(), "a cat", &[], AspectRatio::Square)
            .await
            .unwrap();

        assert_eq!(url, "data:image/png;base64,QUJD");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_image_maps_upstream_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/responses")
            .with_status(429)
            .with_body(
                json!({"error": {"message": "You exceeded your current quota", "type": "insufficient_quota", "code": "insufficient_quota"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server, 60);
        let err = client
            .generate_image(&key(), "a cat", &[], AspectRatio::Square)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_generate_image_unknown_status_keeps_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/responses")
            .with_status(502)
            .with_body("upstream gateway hiccup")
            .create_async()
            .await;

        let client = client_for(&server, 60);
        let err = client
            .generate_image(&key(), "a cat", &[], AspectRatio::Square)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API error: upstream gateway hiccup");
    }
}
