use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: u64,
    pub max_jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2,
            max_jitter_ms: 500,
        }
    }
}

impl RetryConfig {
    /// Backoff before jitter for the retry that follows attempt `attempt_index`.
    pub fn base_delay(&self, attempt_index: u32) -> Duration {
        let factor = self.backoff_multiplier.saturating_pow(attempt_index);
        let delay_ms = self
            .initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    pub fn jittered_delay(&self, attempt_index: u32) -> Duration {
        let jitter_ms = rand::random_range(0..=self.max_jitter_ms);
        self.base_delay(attempt_index) + Duration::from_millis(jitter_ms)
    }
}

/// Errors that can tell whether another attempt is worth making.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    FailedTransient,
    FailedFatal,
}

/// Lifecycle of one request's calls to an upstream collaborator.
///
/// `Attempting(n)` and `Transient(n)` carry the zero-based index of the
/// attempt in flight or about to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Attempting(u32),
    Transient(u32),
    Success,
    Fatal,
}

impl AttemptState {
    pub fn begin(self) -> Self {
        match self {
            AttemptState::Idle => AttemptState::Attempting(0),
            AttemptState::Transient(next) => AttemptState::Attempting(next),
            other => other,
        }
    }

    pub fn record(self, outcome: AttemptOutcome, max_attempts: u32) -> Self {
        let AttemptState::Attempting(index) = self else {
            return self;
        };

        match outcome {
            AttemptOutcome::Succeeded => AttemptState::Success,
            AttemptOutcome::FailedFatal => AttemptState::Fatal,
            AttemptOutcome::FailedTransient if index + 1 >= max_attempts => AttemptState::Fatal,
            AttemptOutcome::FailedTransient => AttemptState::Transient(index + 1),
        }
    }

    pub fn attempt_index(&self) -> Option<u32> {
        match self {
            AttemptState::Attempting(index) | AttemptState::Transient(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Success | AttemptState::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_delay_doubles_per_attempt() {
        let config = RetryConfig::default();

        assert_eq!(config.base_delay(0), Duration::from_millis(1000));
        assert_eq!(config.base_delay(1), Duration::from_millis(2000));
        assert_eq!(config.base_delay(2), Duration::from_millis(4000));
    }

    #[test]
    fn base_delay_is_capped() {
        let config = RetryConfig {
            max_delay_ms: 3000,
            ..RetryConfig::default()
        };

        assert_eq!(config.base_delay(5), Duration::from_millis(3000));
        assert_eq!(config.base_delay(u32::MAX), Duration::from_millis(3000));
    }

    #[test]
    fn jitter_stays_within_bound() {
        let config = RetryConfig::default();

        for _ in 0..100 {
            let delay = config.jittered_delay(1);
            assert!(delay >= Duration::from_millis(2000));
            assert!(delay <= Duration::from_millis(2500));
        }
    }

    #[test]
    fn transient_failures_walk_to_fatal_after_last_attempt() {
        let mut state = AttemptState::Idle.begin();
        assert_eq!(state, AttemptState::Attempting(0));

        state = state.record(AttemptOutcome::FailedTransient, 3);
        assert_eq!(state, AttemptState::Transient(1));

        state = state.begin().record(AttemptOutcome::FailedTransient, 3);
        assert_eq!(state, AttemptState::Transient(2));

        state = state.begin().record(AttemptOutcome::FailedTransient, 3);
        assert_eq!(state, AttemptState::Fatal);
        assert!(state.is_terminal());
    }

    #[test]
    fn fatal_and_success_are_terminal() {
        let fatal = AttemptState::Idle
            .begin()
            .record(AttemptOutcome::FailedFatal, 3);
        assert_eq!(fatal, AttemptState::Fatal);
        assert_eq!(fatal.begin(), AttemptState::Fatal);

        let success = AttemptState::Transient(1)
            .begin()
            .record(AttemptOutcome::Succeeded, 3);
        assert_eq!(success, AttemptState::Success);
        assert_eq!(success.attempt_index(), None);
    }
}
