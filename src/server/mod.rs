//! Axum-based HTTP server for the image-generation relay.
//!
//! The relay accepts a prompt plus options from clients, forwards one
//! request to the upstream image-generation API, and answers with either a
//! `data:` URI or a classified JSON error. It keeps no state between
//! requests beyond the credential read at startup.
//!
//! # Components
//!
//! - `handlers`: `/generate-image`, `/health` and `/metrics`.
//! - `middleware`: CORS and request ID layers.
//! - `routes`: The router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use routes::{create_router, AppState};
