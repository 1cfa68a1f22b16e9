// Relay endpoint wire types
// Author: kelexine (https://github.com/kelexine)

use crate::prompt::{AspectRatio, ColorPalette, Composition, Lighting, Style, Typography};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: RelayOptions,
}

/// Closed option record sent alongside the prompt.
///
/// Style tags are already folded into the prompt text client-side; they
/// travel here for logging only. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelayOptions {
    /// Base64 payloads, no data-URI header, in upload order.
    #[serde(default)]
    pub reference_images: Vec<String>,

    /// Older front ends send this as `size`.
    #[serde(default, alias = "size")]
    pub aspect_ratio: AspectRatio,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<Composition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Lighting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<ColorPalette>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
}

/// Successful relay answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Error body for every non-2xx relay answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let req = GenerateImageRequest {
            prompt: "a cat".to_string(),
            options: RelayOptions {
                reference_images: vec!["QUJD".to_string()],
                aspect_ratio: AspectRatio::Portrait,
                style: Some(Style::Photorealistic),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["options"]["referenceImages"], json!(["QUJD"]));
        assert_eq!(value["options"]["aspectRatio"], "3:4");
        assert_eq!(value["options"]["style"], "Photorealistic");
        assert!(value["options"].get("lighting").is_none());
    }

    #[test]
    fn test_options_reject_unknown_keys() {
        let result = serde_json::from_value::<RelayOptions>(json!({ "seed": 7 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_size_is_read_as_aspect_ratio() {
        let options: RelayOptions = serde_json::from_value(json!({ "size": "3:4" })).unwrap();
        assert_eq!(options.aspect_ratio, AspectRatio::Portrait);
    }

    #[test]
    fn test_missing_options_default() {
        let req: GenerateImageRequest = serde_json::from_value(json!({ "prompt": "x" })).unwrap();
        assert!(req.options.reference_images.is_empty());
        assert_eq!(req.options.aspect_ratio, AspectRatio::Square);
    }

    #[test]
    fn test_response_uses_camel_case() {
        let resp = GenerateImageResponse {
            image_url: Some("data:image/png;base64,AA==".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "imageUrl": "data:image/png;base64,AA==" })
        );
    }
}
