//! Monitor configuration
//!
//! Polling cadence and the repair-failure marker that triggers a fresh run.

use std::time::Duration;

/// Message fragment the job service uses when a run can no longer be
/// repaired because the job's task list changed since it started
pub const TOPOLOGY_CHANGED_MARKER: &str = "Number of tasks changed";

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between two polls of a job's runs
    pub poll_interval: Duration,

    /// Time between a failed state fetch and its retry (bounded wait only)
    pub retry_backoff: Duration,

    /// Repair failures containing this text fall back to starting a new run
    pub topology_changed_marker: String,
}

impl MonitorConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            retry_backoff: Duration::from_secs(10),
            topology_changed_marker: TOPOLOGY_CHANGED_MARKER.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RUNWATCH_POLL_INTERVAL (optional, seconds, default: 60)
    /// - RUNWATCH_RETRY_BACKOFF (optional, seconds, default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup
    ///
    /// Missing or unparsable values fall back to the defaults.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::new();

        let seconds = |key: &str, default: Duration| {
            var(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let config = Self {
            poll_interval: seconds("RUNWATCH_POLL_INTERVAL", defaults.poll_interval),
            retry_backoff: seconds("RUNWATCH_RETRY_BACKOFF", defaults.retry_backoff),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.retry_backoff.is_zero() {
            anyhow::bail!("retry_backoff must be greater than 0");
        }

        if self.topology_changed_marker.is_empty() {
            anyhow::bail!("topology_changed_marker cannot be empty");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}
