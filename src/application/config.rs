//! Scheduler configuration.

use std::time::Duration;

/// Default pacing interval between two ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Default upper bound on items per save request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;

/// Error returned when configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Items released per interval must be greater than zero
    ZeroMaxRate,
    /// Pacing interval must be greater than zero
    ZeroInterval,
    /// Sub-batch size must be greater than zero
    ZeroBatchSize,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroMaxRate => write!(f, "max rate must be greater than 0"),
            ConfigError::ZeroInterval => write!(f, "pacing interval must be greater than 0"),
            ConfigError::ZeroBatchSize => write!(f, "max batch size must be greater than 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Items released per pacing interval
    pub max_rate: usize,
    /// Time between two pacing ticks
    pub interval: Duration,
    /// Upper bound on items per save request
    pub max_batch_size: usize,
}

impl LimiterConfig {
    /// Create a config releasing `max_rate` items per default interval.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroMaxRate` if `max_rate` is zero.
    pub fn new(max_rate: usize) -> Result<Self, ConfigError> {
        Self {
            max_rate,
            interval: DEFAULT_INTERVAL,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
        .validate()
    }

    /// Set the pacing interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the sub-batch size.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Check every field, returning the config unchanged if valid.
    ///
    /// # Errors
    /// Returns the first invalid field as a `ConfigError`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_rate == 0 {
            return Err(ConfigError::ZeroMaxRate);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(self)
    }
}
