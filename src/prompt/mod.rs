//! Prompt composition.
//!
//! A generation request is the user's base prompt plus a closed record of
//! options. Every selected option contributes a comma-separated suffix, in
//! a fixed order, to the text sent upstream.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod options;

pub use options::{AspectRatio, ColorPalette, Composition, Lighting, Style, Typography};

use crate::models::relay::RelayOptions;
use crate::vision::ReferenceSet;

/// Used when neither the base prompt nor any option contributes text.
pub const DEFAULT_PROMPT: &str = "A beautiful, high-quality image";

/// Everything the user picked besides the free-text prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptOptions {
    pub style: Style,
    pub composition: Composition,
    pub lighting: Lighting,
    pub palette: ColorPalette,
    pub typography: Typography,
    pub aspect_ratio: AspectRatio,
    pub reference_images: ReferenceSet,
}

impl PromptOptions {
    /// Wire form of the options, given the already-encoded reference images.
    pub fn to_relay_options(&self, reference_images: Vec<String>) -> RelayOptions {
        RelayOptions {
            reference_images,
            aspect_ratio: self.aspect_ratio,
            style: Some(self.style.clone()),
            composition: Some(self.composition),
            lighting: Some(self.lighting),
            palette: Some(self.palette),
            typography: Some(self.typography),
        }
    }
}

/// Join the trimmed base prompt and the selected option suffixes with ", ".
pub fn compose_prompt(base: &str, options: &PromptOptions) -> String {
    let base = base.trim();
    let parts: Vec<String> = std::iter::once((!base.is_empty()).then(|| base.to_string()))
        .chain([
            options.style.prompt_suffix(),
            options.composition.prompt_suffix(),
            options.lighting.prompt_suffix(),
            options.palette.prompt_suffix(),
            options.typography.prompt_suffix(),
        ])
        .flatten()
        .collect();

    if parts.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_only() {
        let options = PromptOptions {
            style: Style::Photorealistic,
            ..Default::default()
        };
        assert_eq!(compose_prompt("a cat", &options), "a cat, Photorealistic style");
    }

    #[test]
    fn test_suffix_order() {
        let options = PromptOptions {
            style: Style::Watercolor,
            composition: Composition::WideShot,
            lighting: Lighting::GoldenHour,
            palette: ColorPalette::Warm,
            typography: Typography::Script,
            ..Default::default()
        };
        assert_eq!(
            compose_prompt("  a harbour  ", &options),
            "a harbour, Watercolor style, Wide Shot composition, Golden Hour lighting, \
             Warm color palette, Script typography"
        );
    }

    #[test]
    fn test_empty_prompt_falls_back_to_default() {
        assert_eq!(compose_prompt("", &PromptOptions::default()), DEFAULT_PROMPT);
        assert_eq!(compose_prompt("   \n", &PromptOptions::default()), DEFAULT_PROMPT);
    }

    #[test]
    fn test_options_without_base_prompt() {
        let options = PromptOptions {
            lighting: Lighting::Soft,
            ..Default::default()
        };
        assert_eq!(compose_prompt("", &options), "Soft lighting");
    }

    #[test]
    fn test_relay_options_carry_aspect_ratio() {
        let options = PromptOptions {
            aspect_ratio: AspectRatio::Portrait,
            ..Default::default()
        };
        let wire = options.to_relay_options(vec!["abc".to_string()]);
        assert_eq!(wire.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(wire.reference_images, vec!["abc".to_string()]);
    }
}
