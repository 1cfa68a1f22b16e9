// End-to-end generation tests: client, relay and a mocked upstream
// Author: kelexine (https://github.com/kelexine)

use promptcraft::client::{GenerationState, Generator, NetworkStatus, RelayClient, Session};
use promptcraft::config::AppConfig;
use promptcraft::credential::Credential;
use promptcraft::error::{ErrorCode, ErrorKind};
use promptcraft::openai::OpenAiClient;
use promptcraft::prompt::{PromptOptions, Style};
use promptcraft::server::create_router;
use promptcraft::utils::retry::RetryPolicy;
use promptcraft::vision::ReferenceImage;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

/// Start a relay on an ephemeral port in front of `upstream_url`.
async fn spawn_relay(upstream_url: &str) -> String {
    let mut config = AppConfig::default();
    config.upstream.api_base_url = upstream_url.to_string();
    let upstream = OpenAiClient::new(&config.upstream).unwrap();
    let app = create_router(config, upstream, Credential::new("sk-e2e")).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/generate-image", addr)
}

fn generator_for(relay_url: String) -> Generator<RelayClient> {
    let session = Session::new();
    session.login("user-session-key").unwrap();
    let relay = RelayClient::new(relay_url, Duration::from_secs(10), session).unwrap();
    Generator::new(
        relay,
        NetworkStatus::new(),
        RetryPolicy::new(3, Duration::from_millis(10)),
    )
}

#[tokio::test]
async fn test_generate_and_download() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/responses")
        .match_body(mockito::Matcher::PartialJson(json!({
            "input": [{"role": "user", "content": [
                {"type": "input_text", "text": "a cat, Photorealistic style"}
            ]}]
        })))
        .with_status(200)
        .with_body(json!({"output": [{"type": "image_generation_call", "result": "iVBORw0KGgo="}]}).to_string())
        .create_async()
        .await;

    let generator = generator_for(spawn_relay(&upstream.url()).await);
    let options = PromptOptions {
        style: Style::Photorealistic,
        ..Default::default()
    };

    let image = assert_ok!(generator.generate("a cat", &options).await);
    assert_eq!(image.image_url(), "data:image/png;base64,iVBORw0KGgo=");
    assert!(matches!(generator.state(), GenerationState::Succeeded(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = assert_ok!(image.download(dir.path(), generator.relay().http_client()).await);
    let saved = tokio::fs::read(&path).await.unwrap();
    assert!(saved.starts_with(b"\x89PNG"));
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("ai-generated-image-") && n.ends_with(".png")));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_retried_three_times() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/responses")
        .with_status(429)
        .with_body(json!({"error": {"message": "Rate limit reached", "code": "rate_limit_exceeded"}}).to_string())
        .expect(3)
        .create_async()
        .await;

    let generator = generator_for(spawn_relay(&upstream.url()).await);

    let err = assert_err!(generator.generate("a cat", &PromptOptions::default()).await);
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.code(), Some(ErrorCode::RateLimited));
    assert_eq!(
        err.user_friendly_message(),
        "Too many requests. Please wait a moment and try again."
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_reference_images_reach_upstream_in_order() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/responses")
        .match_body(mockito::Matcher::PartialJson(json!({
            "input": [{"role": "user", "content": [
                {"type": "input_text", "text": "a dog"},
                {"type": "input_image", "image_url": "data:image/png;base64,iVBORw0KGgo="},
                {"type": "input_image", "image_url": "data:image/jpeg;base64,/9j/4A=="}
            ]}]
        })))
        .with_status(200)
        .with_body(json!({"output": [{"type": "image_generation_call", "result": "QUJD"}]}).to_string())
        .create_async()
        .await;

    let mut options = PromptOptions::default();
    let rejected = options.reference_images.add(vec![
        ReferenceImage::from_bytes("a.png", "image/png", b"\x89PNG\r\n\x1a\n".to_vec()),
        ReferenceImage::from_bytes("b.jpg", "image/jpeg", b"\xFF\xD8\xFF\xE0".to_vec()),
    ]);
    assert!(rejected.is_empty());

    let generator = generator_for(spawn_relay(&upstream.url()).await);
    assert_ok!(generator.generate("a dog", &options).await);

    mock.assert_async().await;
}
