//! Generation client.
//!
//! Drives one image generation at a time: compose the prompt, check it
//! locally, encode the reference images, call the relay with retries, and
//! publish the outcome as state snapshots and notifications.
//!
//! # Submodules
//!
//! - `generator`: The orchestrator and its state machine.
//! - `relay`: HTTP implementation of [`ImageRelay`].
//! - `session`: The user's credential for the active session.
//! - `network`: Online/offline flag checked before any request.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod generator;
mod network;
mod relay;
mod session;

pub use generator::{GenerationState, Generator, Notification, Severity};
pub use network::NetworkStatus;
pub use relay::RelayClient;
pub use session::Session;

use crate::error::AppError;
use crate::models::relay::{GenerateImageResponse, RelayOptions};
use async_trait::async_trait;

/// One exchange with the image relay. Implementations do not retry.
#[async_trait]
pub trait ImageRelay: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &RelayOptions,
    ) -> Result<GenerateImageResponse, AppError>;
}
