//! Retry policy for transient upstream failures.

use std::time::Duration;

/// Default maximum number of retries for transient errors
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default base delay for exponential backoff (in milliseconds)
pub const DEFAULT_BASE_DELAY_MS: u64 = 250;
/// Maximum delay cap (in milliseconds)
pub const MAX_DELAY_MS: u64 = 30_000;

/// Retry configuration for upstream requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts for failed requests
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Creates a new retry config with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub const fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    /// Calculates the delay for a given retry attempt with jitter
    #[must_use]
    pub fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // base_delay * 2^attempt, capped, plus up to 25% jitter
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX));
        let capped_delay = delay_ms.min(MAX_DELAY_MS);

        let jitter = capped_delay
            .saturating_mul(jitter_factor())
            .saturating_div(4000);
        Duration::from_millis(capped_delay.saturating_add(jitter))
    }
}

/// Pseudo-random factor in `[0, 1000)` taken from the clock's nanoseconds.
fn jitter_factor() -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_stays_within_jitter_bounds() {
        let config = RetryConfig::new().with_base_delay_ms(100);

        let first = config.calculate_backoff_delay(0).as_millis();
        assert!((100..=125).contains(&first));

        let third = config.calculate_backoff_delay(2).as_millis();
        assert!((400..=500).contains(&third));
    }

    #[test]
    fn backoff_is_capped() {
        let config = RetryConfig::new().with_base_delay_ms(10_000);
        let delay = config.calculate_backoff_delay(40).as_millis();
        assert!(delay <= u128::from(MAX_DELAY_MS + MAX_DELAY_MS / 4));
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = RetryConfig::new().with_max_retries(0).with_base_delay_ms(5);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.base_delay_ms, 5);
        assert_eq!(RetryConfig::default().max_retries, DEFAULT_MAX_RETRIES);
    }
}
