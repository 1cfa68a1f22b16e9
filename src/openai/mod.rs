// Upstream image-generation API module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::{build_request, extract_image, reference_data_uri, OpenAiClient};
