// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{generate_image_handler, health_handler, metrics_handler};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::credential::Credential;
use crate::error::Result;
use crate::openai::OpenAiClient;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub upstream: Arc<OpenAiClient>,
    /// Read once at startup; `None` makes every generation fail with a 500.
    pub api_key: Option<Arc<Credential>>,
}

pub fn create_router(
    config: AppConfig,
    upstream: OpenAiClient,
    api_key: Option<Credential>,
) -> Result<Router> {
    let body_limit = config.server.body_limit_bytes;
    let state = AppState {
        config,
        upstream: Arc::new(upstream),
        api_key: api_key.map(Arc::new),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/generate-image", post(generate_image_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Up to five base64 reference images per request. Enforced by the
        // body extractor so an oversized body still gets a JSON error.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
