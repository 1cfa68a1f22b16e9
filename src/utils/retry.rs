// Retry with exponential backoff
// Author: kelexine (https://github.com/kelexine)

use backoff::{backoff::Backoff, ExponentialBackoff};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try, and how long to wait before the first retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }
}

/// Create the backoff schedule: `initial`, `2 * initial`, `4 * initial`, ...
///
/// No jitter and no overall deadline; the attempt count is the only bound.
pub fn create_backoff(initial_delay: Duration) -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: initial_delay,
        initial_interval: initial_delay,
        randomization_factor: 0.0,
        multiplier: 2.0,
        max_interval: Duration::from_secs(60 * 60),
        max_elapsed_time: None,
        ..Default::default()
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is used up.
///
/// Attempts run one after another, never overlapping. After failed attempt
/// `k` the wrapper sleeps `initial_delay * 2^(k-1)`. When the last attempt
/// fails its error is returned as-is. Cancelling early is the operation's
/// business; drop the returned future to stop waiting.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = create_backoff(policy.initial_delay);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= max_attempts {
                    warn!(
                        "{} failed after {} attempt(s): {}",
                        operation_name, attempt, error
                    );
                    return Err(error);
                }

                let delay = backoff.next_backoff().unwrap_or(policy.initial_delay);
                debug!(
                    "{} failed (attempt {}/{}): {}; retrying after {}ms",
                    operation_name,
                    attempt,
                    max_attempts,
                    error,
                    delay.as_millis()
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
