//! Bounded exponential backoff for outbound pushes.
//!
//! Retries only transient failures (transport and server-side errors); a
//! parse or validation failure will not get better on a second try and
//! aborts immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::KalsyncResult;

/// Default total number of push attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Retry configuration for the pusher.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of push attempts.
    pub max_attempts: u32,
    /// Backoff unit; the sleep doubles after each failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after a given zero-based attempt: `base * 2^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `push` up to `config.max_attempts` times.
///
/// Success returns immediately with no further attempts. Each transient
/// failure sleeps `base * 2^attempt` (1s, 2s, 4s with the defaults) before
/// the loop continues; after the final attempt the last error is returned
/// as terminal and the caller decides what to report.
pub async fn push_with_retry<F, Fut>(config: &RetryConfig, push: F) -> KalsyncResult<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = KalsyncResult<()>>,
{
    let mut attempt = 0;
    loop {
        match push().await {
            Ok(()) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "push succeeded after retrying");
                }
                return Ok(());
            }
            Err(e) if e.is_transient() => {
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts,
                    error = %e,
                    ?delay,
                    "push attempt failed"
                );
                tokio::time::sleep(delay).await;

                attempt += 1;
                if attempt >= config.max_attempts {
                    error!(attempts = attempt, error = %e, "push attempts exhausted");
                    return Err(e);
                }
            }
            Err(e) => return Err(e),
        }
    }
}
