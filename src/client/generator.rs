// Generation orchestrator
// Author: kelexine (https://github.com/kelexine)

use super::{ImageRelay, NetworkStatus};
use crate::error::AppError;
use crate::metrics;
use crate::prompt::{compose_prompt, PromptOptions};
use crate::utils::retry::{retry_with_backoff, RetryPolicy};
use crate::validation::validate_prompt;
use crate::vision::GeneratedImage;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

const NOTIFICATION_CAPACITY: usize = 16;

/// Where the current generation stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Succeeded(GeneratedImage),
    /// `message` is ready for display.
    Failed { message: String, error: AppError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A toast-style message about a finished step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    fn error(title: &str, error: &AppError) -> Self {
        Self {
            title: title.to_string(),
            description: error.user_friendly_message(),
            severity: Severity::Error,
        }
    }
}

/// Runs generations against an [`ImageRelay`].
///
/// Each call to [`generate`](Self::generate) takes a fresh epoch. State
/// and notifications are only published while that epoch is still the
/// latest, so a slow call that was superseded cannot overwrite a newer
/// result.
pub struct Generator<R: ImageRelay> {
    relay: R,
    network: NetworkStatus,
    policy: RetryPolicy,
    state: watch::Sender<GenerationState>,
    notifications: broadcast::Sender<Notification>,
    last_attempt: Mutex<Option<(String, PromptOptions)>>,
    epoch: AtomicU64,
}

impl<R: ImageRelay> Generator<R> {
    pub fn new(relay: R, network: NetworkStatus, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(GenerationState::Idle);
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            relay,
            network,
            policy,
            state,
            notifications,
            last_attempt: Mutex::new(None),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    pub fn is_generating(&self) -> bool {
        matches!(*self.state.borrow(), GenerationState::Generating)
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.subscribe()
    }

    /// Receive notifications published after this call.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// The prompt and options of the most recent generation that got past
    /// the local checks.
    pub fn last_attempt(&self) -> Option<(String, PromptOptions)> {
        self.last_attempt.lock().clone()
    }

    /// Generate one image from `prompt` and `options`.
    ///
    /// Local failures (prompt, connectivity, reference files) return before
    /// any request is made. Relay failures are retried per the policy.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &PromptOptions,
    ) -> Result<GeneratedImage, AppError> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let composed = compose_prompt(prompt, options);
        if let Err(e) = validate_prompt(&composed) {
            self.fail(epoch, &e, "Validation Error");
            return Err(e);
        }

        if !self.network.is_online() {
            let e = AppError::network(
                "No internet connection. Please check your connection and try again.",
            );
            self.fail(epoch, &e, "Network Error");
            return Err(e);
        }

        // Overwrites the previous attempt only once this one actually starts
        *self.last_attempt.lock() = Some((prompt.to_string(), options.clone()));
        self.publish(epoch, GenerationState::Generating);

        debug!("Generation #{} started: {}", epoch, composed);

        match self.run(&composed, options).await {
            Ok(image) => {
                if self.publish(epoch, GenerationState::Succeeded(image.clone())) {
                    metrics::record_generation_success();
                    info!("Generation #{} succeeded", epoch);
                    self.notify(Notification {
                        title: "Image Generated!".to_string(),
                        description: "Your AI-generated image is ready.".to_string(),
                        severity: Severity::Success,
                    });
                }
                Ok(image)
            }
            Err(e) => {
                self.fail(epoch, &e, "Generation Failed");
                Err(e)
            }
        }
    }

    /// Run the last attempt again. `None` when nothing was attempted yet.
    pub async fn retry_last(&self) -> Option<Result<GeneratedImage, AppError>> {
        let (prompt, options) = self.last_attempt()?;
        info!("Retrying last generation");
        Some(self.generate(&prompt, &options).await)
    }

    async fn run(
        &self,
        composed: &str,
        options: &PromptOptions,
    ) -> Result<GeneratedImage, AppError> {
        let encoded = options.reference_images.encode_all().await?;
        let relay_options = options.to_relay_options(encoded);

        let relay = &self.relay;
        let relay_options = &relay_options;
        let response = retry_with_backoff("Image generation", self.policy, move || {
            relay.generate(composed, relay_options)
        })
        .await?;

        match response.image_url {
            Some(url) if !url.trim().is_empty() => Ok(GeneratedImage::new(url)),
            _ => Err(AppError::generation("No image was generated")
                .with_details("The API returned an empty response")),
        }
    }

    fn fail(&self, epoch: u64, error: &AppError, title: &str) {
        let state = GenerationState::Failed {
            message: error.user_friendly_message(),
            error: error.clone(),
        };
        if self.publish(epoch, state) {
            metrics::record_generation_failure(error.kind());
            warn!("Generation #{} failed: {}", epoch, error);
            self.notify(Notification::error(title, error));
        }
    }

    /// Publish `state` if `epoch` is still current. Returns whether it was.
    fn publish(&self, epoch: u64, state: GenerationState) -> bool {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            metrics::record_generation_superseded();
            debug!("Discarding outcome of superseded generation #{}", epoch);
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }
}
