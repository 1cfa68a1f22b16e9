// CLI module for promptcraft
// Author: kelexine (https://github.com/kelexine)

use crate::prompt::{AspectRatio, ColorPalette, Composition, Lighting, Style, Typography};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// promptcraft - AI image generation relay and prompt builder
#[derive(Parser, Debug)]
#[command(name = "promptcraft", version, about, long_about = None)]
pub struct Args {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the image-generation relay
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate an image through a running relay and save it
    Generate(GenerateArgs),
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// Base prompt; options are appended to it
    #[arg(short, long, default_value = "")]
    pub prompt: String,

    /// Preset name ("Photorealistic", "Low Poly", ...) or any custom style
    #[arg(long)]
    pub style: Option<Style>,

    #[arg(long, default_value = "None")]
    pub composition: Composition,

    #[arg(long, default_value = "None")]
    pub lighting: Lighting,

    #[arg(long, default_value = "None")]
    pub palette: ColorPalette,

    #[arg(long, default_value = "None")]
    pub typography: Typography,

    /// 1:1, 3:4 or 4:3
    #[arg(long, default_value = "1:1")]
    pub aspect_ratio: AspectRatio,

    /// Reference image (PNG, JPEG or WebP, up to 5 MB); repeat for more
    #[arg(short, long = "reference")]
    pub references: Vec<PathBuf>,

    /// Directory to save the image in
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Relay endpoint (overrides config)
    #[arg(long, env = "PROMPTCRAFT_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Credential sent to the relay
    #[arg(long, env = "PROMPTCRAFT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Extra attempts after automatic retries give up on a retryable error
    #[arg(long, default_value_t = 0)]
    pub manual_retries: u32,
}
