// Closed prompt option enumerations
// Author: kelexine (https://github.com/kelexine)

use crate::error::AppError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a preset option whose first variant is `None` (no suffix).
///
/// Each variant carries its display string; that string is also the wire
/// form and the text appended to the prompt before `$suffix`.
macro_rules! preset_option {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, $suffix:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            None,
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::None, $($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::None => "None",
                    $($name::$variant => $text),+
                }
            }

            /// Text appended to the prompt, or `None` when nothing is selected.
            pub fn prompt_suffix(&self) -> Option<String> {
                match self {
                    $name::None => None,
                    other => Some(format!("{} {}", other.as_str(), $suffix)),
                }
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        AppError::validation(format!("Unknown {}: {}", $label, wanted)).with_details(
                            format!(
                                "Expected one of: {}",
                                Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                            ),
                        )
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|e: AppError| de::Error::custom(e.message()))
            }
        }
    };
}

preset_option! {
    /// Framing of the scene.
    Composition, "composition", "composition" {
        RuleOfThirds => "Rule of Thirds",
        Center => "Center Composition",
        DynamicAngle => "Dynamic Angle",
        CloseUp => "Close-up",
        WideShot => "Wide Shot",
        BirdsEyeView => "Birds Eye View",
        LowAngle => "Low Angle",
    }
}

preset_option! {
    Lighting, "lighting", "lighting" {
        GoldenHour => "Golden Hour",
        Cinematic => "Cinematic",
        Soft => "Soft",
        Natural => "Natural",
        Backlit => "Backlit",
    }
}

preset_option! {
    ColorPalette, "color palette", "color palette" {
        Vibrant => "Vibrant",
        Pastel => "Pastel",
        Monochrome => "Monochrome",
        Warm => "Warm",
        Cool => "Cool",
        Earth => "Earth",
        Neon => "Neon",
    }
}

preset_option! {
    /// Lettering style for any text rendered in the image.
    Typography, "typography", "typography" {
        ModernSans => "Modern Sans",
        ClassicSerif => "Classic Serif",
        BoldDisplay => "Bold Display",
        Script => "Script",
        Minimal => "Minimal",
        Decorative => "Decorative",
        Monospace => "Monospace",
    }
}

/// Visual style: a preset, or free text entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    None,
    Photorealistic,
    FlatIllustration,
    Whimsical3D,
    Watercolor,
    LowPoly,
    Custom(String),
}

impl Style {
    pub const PRESETS: &'static [Style] = &[
        Style::None,
        Style::Photorealistic,
        Style::FlatIllustration,
        Style::Whimsical3D,
        Style::Watercolor,
        Style::LowPoly,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Style::None => "None",
            Style::Photorealistic => "Photorealistic",
            Style::FlatIllustration => "Flat Illustration",
            Style::Whimsical3D => "Whimsical 3D",
            Style::Watercolor => "Watercolor",
            Style::LowPoly => "Low Poly",
            Style::Custom(text) => text,
        }
    }

    pub fn prompt_suffix(&self) -> Option<String> {
        match self {
            Style::None => None,
            Style::Custom(text) if text.trim().is_empty() => None,
            other => Some(format!("{} style", other.as_str().trim())),
        }
    }
}

impl FromStr for Style {
    type Err = AppError;

    /// Presets match case-insensitively; anything else becomes a custom style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(AppError::validation("Custom style cannot be empty"));
        }
        Ok(Self::PRESETS
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .cloned()
            .unwrap_or_else(|| Style::Custom(wanted.to_string())))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: AppError| de::Error::custom(e.message()))
    }
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait,
    Landscape,
}

impl AspectRatio {
    pub const ALL: &'static [AspectRatio] =
        &[AspectRatio::Square, AspectRatio::Portrait, AspectRatio::Landscape];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Square",
            AspectRatio::Portrait => "Portrait",
            AspectRatio::Landscape => "Landscape",
        }
    }

    /// Canvas size requested from the upstream image tool.
    pub fn upstream_size(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1024x1024",
            AspectRatio::Portrait => "1024x1536",
            AspectRatio::Landscape => "1536x1024",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = AppError;

    /// Accepts the ratio ("3:4") or its label ("portrait").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == wanted || r.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::validation(format!("Unknown aspect ratio: {}", wanted))
                    .with_details("Expected one of: 1:1, 3:4, 4:3")
            })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: AppError| de::Error::custom(e.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing_is_case_insensitive() {
        assert_eq!("golden hour".parse::<Lighting>().unwrap(), Lighting::GoldenHour);
        assert_eq!("Rule of Thirds".parse::<Composition>().unwrap(), Composition::RuleOfThirds);
        assert_eq!("none".parse::<Typography>().unwrap(), Typography::None);
        assert!("Strobe".parse::<Lighting>().is_err());
    }

    #[test]
    fn test_style_custom_fallback() {
        assert_eq!("photorealistic".parse::<Style>().unwrap(), Style::Photorealistic);
        assert_eq!(
            "cyberpunk".parse::<Style>().unwrap(),
            Style::Custom("cyberpunk".to_string())
        );
        assert!("   ".parse::<Style>().is_err());
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(Lighting::None.prompt_suffix(), None);
        assert_eq!(Lighting::Cinematic.prompt_suffix().as_deref(), Some("Cinematic lighting"));
        assert_eq!(
            ColorPalette::Pastel.prompt_suffix().as_deref(),
            Some("Pastel color palette")
        );
        assert_eq!(Style::LowPoly.prompt_suffix().as_deref(), Some("Low Poly style"));
        assert_eq!(Style::Custom(String::new()).prompt_suffix(), None);
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&Composition::BirdsEyeView).unwrap();
        assert_eq!(json, "\"Birds Eye View\"");
        let parsed: AspectRatio = serde_json::from_str("\"4:3\"").unwrap();
        assert_eq!(parsed, AspectRatio::Landscape);
        assert!(serde_json::from_str::<AspectRatio>("\"16:9\"").is_err());
    }
}
