//! Retry and backoff settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::validation::{ValidationContext, Validator};

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Fixed delay between retries.
    Fixed,
    /// Linear increase: delay = initial + (attempt * increment).
    Linear {
        /// Amount to add per retry attempt.
        increment_ms: u64,
    },
    /// Exponential increase: delay = initial * (multiplier ^ (attempt - 1)).
    Exponential {
        /// Multiplier for each retry (typically 2.0).
        multiplier: f64,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential { multiplier: 2.0 }
    }
}

/// Retry configuration.
///
/// # Example YAML
///
/// ```yaml
/// max_retries: 3
/// initial_delay: 10ms
/// max_delay: 200ms
/// backoff_strategy:
///   type: exponential
///   multiplier: 2.0
/// jitter: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry.
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    #[serde(default = "default_max_delay", with = "humantime_serde")]
    pub max_delay: Duration,
    /// Backoff strategy to use.
    #[serde(default)]
    pub backoff_strategy: BackoffStrategy,
    /// Whether to add random jitter to delays.
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(10)
}

fn default_max_delay() -> Duration {
    Duration::from_millis(200)
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_strategy: BackoffStrategy::default(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    /// Sets the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff_strategy = strategy;
        self
    }

    /// Enables or disables jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub(crate) fn validate_with_context(&self, ctx: &mut ValidationContext) {
        let mut validator = Validator::new(ctx);
        validator.custom(
            "max_delay",
            || self.max_delay >= self.initial_delay,
            "max_delay must not be shorter than initial_delay",
        );
        if let BackoffStrategy::Exponential { multiplier } = self.backoff_strategy {
            validator.custom(
                "backoff_strategy.multiplier",
                || multiplier >= 1.0,
                "multiplier must be at least 1.0",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humantime_durations() {
        let yaml = "initial_delay: 25ms\nmax_delay: 1s\nbackoff_strategy:\n  type: fixed\n";
        let config: RetryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.initial_delay, Duration::from_millis(25));
        assert_eq!(config.max_delay, Duration::from_secs(1));
        assert_eq!(config.backoff_strategy, BackoffStrategy::Fixed);
        assert_eq!(config.max_retries, 3);
        assert!(config.jitter);
    }

    #[test]
    fn test_validation_rejects_inverted_bounds() {
        let config = RetryConfig::default().with_initial_delay(Duration::from_secs(5));
        let mut ctx = ValidationContext::new();
        config.validate_with_context(&mut ctx);
        assert!(!ctx.is_valid());
    }

    #[test]
    fn test_validation_rejects_shrinking_multiplier() {
        let config =
            RetryConfig::default().with_backoff(BackoffStrategy::Exponential { multiplier: 0.5 });
        let mut ctx = ValidationContext::new();
        config.validate_with_context(&mut ctx);
        assert!(!ctx.is_valid());
    }
}
