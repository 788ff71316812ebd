use std::{fmt::Display, future::Future};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::models::retry::{AttemptOutcome, AttemptState, RetryConfig, Retryable};

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// `config.max_attempts` attempts have been made.
///
/// The wait before retry `n + 1` is the backoff for attempt index `n` plus
/// jitter; nothing is slept before the first attempt or after the last.
pub async fn retry_with_backoff<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut state = AttemptState::Idle.begin();

    loop {
        let attempt = state.attempt_index().unwrap_or_default();
        let result = operation().await;

        let outcome = match &result {
            Ok(_) => AttemptOutcome::Succeeded,
            Err(e) if e.is_transient() => AttemptOutcome::FailedTransient,
            Err(_) => AttemptOutcome::FailedFatal,
        };

        state = state.record(outcome, config.max_attempts);

        if state.is_terminal() {
            match (&result, outcome) {
                (Ok(_), _) if attempt > 0 => info!(
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts,
                    "Retry succeeded"
                ),
                (Ok(_), _) => {}
                (Err(e), AttemptOutcome::FailedFatal) => warn!(
                    attempt = attempt + 1,
                    error = %e,
                    "Non-transient failure, not retrying"
                ),
                (Err(e), _) => warn!(
                    max_attempts = config.max_attempts,
                    error = %e,
                    "Retry failed after exhausting all attempts"
                ),
            }
            return result;
        }

        let delay = config.jittered_delay(attempt);

        if let Err(e) = &result {
            debug!(
                attempt = attempt + 1,
                max_attempts = config.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %e,
                "Transient failure, backing off"
            );
        }

        sleep(delay).await;

        state = state.begin();
    }
}
