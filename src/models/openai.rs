// OpenAI Responses API type definitions (image generation subset)
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /responses` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model driving the image-generation tool (e.g. "gpt-4.1-mini").
    pub model: String,

    /// A single user turn.
    pub input: Vec<InputMessage>,

    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

/// One part of a multimodal user turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText { text: String },
    /// `image_url` is a full `data:` URI.
    InputImage { image_url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    ImageGeneration {
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
    },
}

/// `POST /responses` answer; only the output list matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type", default)]
    pub item_type: String,

    /// Base64 image for `image_generation_call` items. Left untyped so a
    /// malformed payload is reported as invalid image data, not a parse error.
    #[serde(default)]
    pub result: Option<Value>,
}

pub const IMAGE_GENERATION_CALL: &str = "image_generation_call";

/// Upstream error envelope: `{ "error": { "message", "type", "code" } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}
