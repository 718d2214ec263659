//! Board configuration.
//!
//! # Environment Variables
//!
//! - `QUEUEBOARD_MIN_JUSTIFICATION`: shortest accepted transfer justification
//! - `QUEUEBOARD_CAPACITY_PER_PROVIDER`: patients per provider for capacity
//! - `QUEUEBOARD_OVERDUE_MINUTES`: wait after which an entry is overdue

use tracing::warn;

use crate::filter::DEFAULT_OVERDUE_MINUTES;
use crate::stats::DEFAULT_CAPACITY_PER_PROVIDER;
use crate::transfer::DEFAULT_MIN_JUSTIFICATION_LEN;

/// Environment variable for the minimum justification length.
pub const MIN_JUSTIFICATION_ENV: &str = "QUEUEBOARD_MIN_JUSTIFICATION";

/// Environment variable for the per-provider capacity.
pub const CAPACITY_ENV: &str = "QUEUEBOARD_CAPACITY_PER_PROVIDER";

/// Environment variable for the overdue threshold.
pub const OVERDUE_ENV: &str = "QUEUEBOARD_OVERDUE_MINUTES";

/// Tunables for the derived views and the transfer dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Shortest justification the transfer dialog accepts.
    pub min_justification_len: usize,
    /// Patients per provider used for the capacity percentage.
    pub capacity_per_provider: u32,
    /// Wait (minutes) after which the overdue filter matches.
    pub overdue_after_minutes: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_justification_len: DEFAULT_MIN_JUSTIFICATION_LEN,
            capacity_per_provider: DEFAULT_CAPACITY_PER_PROVIDER,
            overdue_after_minutes: DEFAULT_OVERDUE_MINUTES,
        }
    }
}

impl BoardConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from defaults overridden by environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, MIN_JUSTIFICATION_ENV) {
            config.min_justification_len = v;
        }
        if let Some(v) = parse_var(&lookup, CAPACITY_ENV) {
            config.capacity_per_provider = v;
        }
        if let Some(v) = parse_var(&lookup, OVERDUE_ENV) {
            config.overdue_after_minutes = v;
        }

        config
    }

    /// Sets the minimum justification length.
    pub fn with_min_justification_len(mut self, len: usize) -> Self {
        self.min_justification_len = len;
        self
    }

    /// Sets the per-provider capacity.
    pub fn with_capacity_per_provider(mut self, capacity: u32) -> Self {
        self.capacity_per_provider = capacity;
        self
    }

    /// Sets the overdue threshold.
    pub fn with_overdue_after(mut self, minutes: u32) -> Self {
        self.overdue_after_minutes = minutes;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring invalid config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();

        assert_eq!(config.min_justification_len, 10);
        assert_eq!(config.capacity_per_provider, 8);
        assert_eq!(config.overdue_after_minutes, 60);
    }

    #[test]
    fn test_config_builder() {
        let config = BoardConfig::new()
            .with_min_justification_len(20)
            .with_capacity_per_provider(6)
            .with_overdue_after(45);

        assert_eq!(config.min_justification_len, 20);
        assert_eq!(config.capacity_per_provider, 6);
        assert_eq!(config.overdue_after_minutes, 45);
    }

    #[test]
    fn test_from_lookup_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            (MIN_JUSTIFICATION_ENV, "15"),
            (CAPACITY_ENV, "lots"),
            (OVERDUE_ENV, " 90 "),
        ]
        .into_iter()
        .collect();

        let config = BoardConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.min_justification_len, 15);
        assert_eq!(config.capacity_per_provider, 8);
        assert_eq!(config.overdue_after_minutes, 90);
    }
}
