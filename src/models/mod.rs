//! Wire types for the relay endpoint and the upstream API.
//!
//! - `relay`: what clients send to and receive from `POST /generate-image`
//! - `openai`: the Responses API subset used for image generation

// Author: kelexine (https://github.com/kelexine)

pub mod openai;
pub mod relay;

pub use relay::{ErrorBody, GenerateImageRequest, GenerateImageResponse, RelayOptions};
