//! Runtime configuration.

use std::time::Duration;

use tracing::warn;

use crate::error::{Result, RuntimeError};

/// Environment variable overriding the tick interval, in seconds.
pub const TICK_SECS_ENV: &str = "QUEUEBOARD_TICK_SECS";

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How often every queued entry ages by one minute.
    pub tick_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from defaults overridden by `QUEUEBOARD_TICK_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(TICK_SECS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.tick_interval = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {}", TICK_SECS_ENV),
            }
        }

        config
    }

    /// Sets the tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Checks that the config can drive a ticker.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(RuntimeError::InvalidConfig(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
