//! Retry policy with configurable backoff.
//!
//! Used by the engine between optimistic-concurrency retries and between
//! ledger append retries.
//!
//! # Example
//!
//! ```
//! use fondo_core::config::{BackoffStrategy, RetryConfig};
//! use fondo_engine::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(
//!     RetryConfig::default()
//!         .with_initial_delay(Duration::from_millis(10))
//!         .with_backoff(BackoffStrategy::Exponential { multiplier: 2.0 })
//!         .with_jitter(false),
//! );
//!
//! assert_eq!(policy.get_delay(1), Duration::from_millis(10));
//! assert_eq!(policy.get_delay(2), Duration::from_millis(20));
//! ```

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]

use fondo_core::config::{BackoffStrategy, RetryConfig};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Retry policy computing delays between attempts.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a new retry policy with the given configuration.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Creates a policy that retries immediately. Used in tests.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(RetryConfig {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_strategy: BackoffStrategy::Fixed,
            jitter: false,
        })
    }

    /// Returns the maximum number of retries.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Returns true if another retry is allowed after `attempt` retries.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.config.max_retries
    }

    /// Calculates the delay before retry `attempt` (1-indexed).
    #[must_use]
    pub fn get_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let capped = self.base_delay(attempt).min(self.config.max_delay);
        let delay = if self.config.jitter {
            Self::add_jitter(capped)
        } else {
            capped
        };

        debug!(
            attempt = attempt,
            delay_ms = delay.as_millis() as u64,
            "Calculated retry delay"
        );
        delay
    }

    /// Sleeps for the delay of retry `attempt`.
    pub async fn wait(&self, attempt: u32) {
        let delay = self.get_delay(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn base_delay(&self, attempt: u32) -> Duration {
        let initial_ms = self.config.initial_delay.as_millis() as f64;

        let delay_ms = match self.config.backoff_strategy {
            BackoffStrategy::Fixed => initial_ms,
            BackoffStrategy::Linear { increment_ms } => {
                initial_ms + f64::from(attempt - 1) * increment_ms as f64
            }
            BackoffStrategy::Exponential { multiplier } => {
                initial_ms * multiplier.powi(attempt as i32 - 1)
            }
        };

        Duration::from_millis(delay_ms.min(u64::MAX as f64) as u64)
    }

    // Scales the delay into [75%, 100%].
    fn add_jitter(delay: Duration) -> Duration {
        let ms = delay.as_millis() as f64;
        let factor = rand::thread_rng().gen_range(0.75..=1.0);
        Duration::from_millis((ms * factor) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(strategy: BackoffStrategy) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_strategy: strategy,
            jitter: false,
        })
    }

    #[test]
    fn test_should_retry_bound() {
        let policy = RetryPolicy::immediate(3);
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = no_jitter(BackoffStrategy::Exponential { multiplier: 2.0 });
        assert_eq!(policy.get_delay(1), Duration::from_millis(100));
        assert_eq!(policy.get_delay(2), Duration::from_millis(200));
        assert_eq!(policy.get_delay(4), Duration::from_millis(800));
    }

    #[test]
    fn test_linear_backoff() {
        let policy = no_jitter(BackoffStrategy::Linear { increment_ms: 50 });
        assert_eq!(policy.get_delay(1), Duration::from_millis(100));
        assert_eq!(policy.get_delay(3), Duration::from_millis(200));
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = RetryPolicy::new(RetryConfig {
            max_retries: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            backoff_strategy: BackoffStrategy::Exponential { multiplier: 2.0 },
            jitter: false,
        });
        assert_eq!(policy.get_delay(10), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let policy = RetryPolicy::new(RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_strategy: BackoffStrategy::Fixed,
            jitter: true,
        });
        for _ in 0..20 {
            let delay = policy.get_delay(1);
            assert!(delay >= Duration::from_millis(750));
            assert!(delay <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_zero_attempt() {
        assert_eq!(RetryPolicy::default().get_delay(0), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_immediate_wait_returns() {
        RetryPolicy::immediate(1).wait(1).await;
    }
}
