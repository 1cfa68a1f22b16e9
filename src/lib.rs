// promptcraft - AI image generation relay and prompt builder
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod prompt;
pub mod server;
pub mod utils;
pub mod validation;
pub mod vision;
