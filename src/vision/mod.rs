//! Image handling for both ends of the relay.
//!
//! Reference images are collected, validated and base64-encoded on the
//! client; the relay sniffs their format to label the data URIs it sends
//! upstream; the generated image is decoded or fetched for download.
//!
//! # Submodules
//!
//! - `models`: Accepted formats, magic-byte detection, base64/data-URI helpers.
//! - `reference`: Reference image upload, validation and encoding.
//! - `output`: The generated image and its download.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod output;
pub mod reference;

pub use models::ImageFormat;
pub use output::GeneratedImage;
pub use reference::{ReferenceImage, ReferenceSet, MAX_REFERENCE_IMAGES};
