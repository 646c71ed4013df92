//! Reconnect backoff schedule.
//!
//! Exponential delay between reconnection attempts: base interval doubled
//! per attempt, capped, with random jitter added by the caller to avoid
//! synchronized retry storms across many clients. The deterministic part
//! lives here; entropy comes from the caller's [`crate::Environment`].

use std::time::Duration;

/// Default base delay before the first reconnect attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Ceiling for the exponential schedule.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Upper bound (exclusive) on the random jitter added per attempt.
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(1000);

/// Backoff schedule parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Delay before the first retry; doubled per subsequent attempt.
    pub base_delay: Duration,
    /// Cap applied after doubling.
    pub max_delay: Duration,
    /// Jitter range; the actual jitter is uniform in `[0, max_jitter)`.
    pub max_jitter: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

/// Deterministic delay for the given zero-based attempt number.
///
/// `base_delay * 2^attempt`, saturating, capped at `max_delay`.
#[must_use]
pub fn backoff_delay(config: &BackoffConfig, attempt: u32) -> Duration {
    let multiplier = if attempt >= 32 { u32::MAX } else { 1u32 << attempt };
    config.base_delay.saturating_mul(multiplier).min(config.max_delay)
}

/// Jitter derived from caller-supplied entropy, uniform in
/// `[0, max_jitter)`. Zero when jitter is disabled.
#[must_use]
pub fn jitter(config: &BackoffConfig, entropy: u64) -> Duration {
    let range = config.max_jitter.as_millis() as u64;
    if range == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(entropy % range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let config = BackoffConfig::default();
        assert_eq!(backoff_delay(&config, 0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(&config, 1), Duration::from_millis(2000));
        assert_eq!(backoff_delay(&config, 2), Duration::from_millis(4000));
        assert_eq!(backoff_delay(&config, 4), Duration::from_millis(16_000));
    }

    #[test]
    fn delay_is_capped() {
        let config = BackoffConfig::default();
        assert_eq!(backoff_delay(&config, 5), Duration::from_millis(30_000));
        assert_eq!(backoff_delay(&config, 10), Duration::from_millis(30_000));
    }

    #[test]
    fn huge_attempt_numbers_do_not_overflow() {
        let config = BackoffConfig::default();
        assert_eq!(backoff_delay(&config, u32::MAX), config.max_delay);
    }

    #[test]
    fn jitter_stays_in_range() {
        let config = BackoffConfig::default();
        for entropy in [0, 1, 999, 1000, 1001, u64::MAX] {
            assert!(jitter(&config, entropy) < config.max_jitter);
        }
    }

    #[test]
    fn zero_jitter_config_disables_jitter() {
        let config = BackoffConfig { max_jitter: Duration::ZERO, ..BackoffConfig::default() };
        assert_eq!(jitter(&config, u64::MAX), Duration::ZERO);
    }
}
