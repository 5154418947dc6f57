//! Client configuration
//!
//! Defines connection settings for the status source and the tunables of the
//! completion monitor: poll interval, retry bound and backoff.

use std::time::Duration;

use dagwatch_core::domain::application::ApplicationId;

/// Where to find the application master and resource manager
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Application master base URL (e.g., "http://am-host:10030")
    pub am_url: String,

    /// Resource manager base URL, used for the application report and fallback status
    pub rm_url: Option<String>,

    /// Application the DAG runs in
    pub application_id: ApplicationId,

    /// Upper bound on a single request
    pub request_timeout: Duration,
}

impl SourceConfig {
    pub fn new(am_url: impl Into<String>, application_id: ApplicationId) -> Self {
        Self {
            am_url: am_url.into(),
            rm_url: None,
            application_id,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_rm_url(mut self, rm_url: impl Into<String>) -> Self {
        self.rm_url = Some(rm_url.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_http_url(&self.am_url) {
            anyhow::bail!("am_url must start with http:// or https://");
        }

        if let Some(rm_url) = &self.rm_url {
            if !is_http_url(rm_url) {
                anyhow::bail!("rm_url must start with http:// or https://");
            }
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Exponential backoff with a cap
///
/// The delay before retry `n` (1-indexed) is `initial * 2^(n-1)`, never more
/// than `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl BackoffPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

/// Completion monitor tunables
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep between successful non-terminal polls
    pub poll_interval: Duration,

    /// Consecutive transport failures tolerated before the wait aborts
    pub max_retries: u32,

    /// Delay before the first retry after a transport failure
    pub initial_backoff: Duration,

    /// Ceiling for the retry delay
    pub max_backoff: Duration,
}

impl MonitorConfig {
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial: self.initial_backoff,
            max: self.max_backoff,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Optional environment variables (unset or unparsable values keep the default):
    /// - DAGWATCH_POLL_INTERVAL_MS (default: 1000)
    /// - DAGWATCH_MAX_RETRIES (default: 5)
    /// - DAGWATCH_INITIAL_BACKOFF_MS (default: 500)
    /// - DAGWATCH_MAX_BACKOFF_MS (default: 30000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let millis = |key: &str, fallback: Duration| {
            std::env::var(key)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        let max_retries = std::env::var("DAGWATCH_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_retries);

        Self {
            poll_interval: millis("DAGWATCH_POLL_INTERVAL_MS", defaults.poll_interval),
            max_retries,
            initial_backoff: millis("DAGWATCH_INITIAL_BACKOFF_MS", defaults.initial_backoff),
            max_backoff: millis("DAGWATCH_MAX_BACKOFF_MS", defaults.max_backoff),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.initial_backoff.is_zero() {
            anyhow::bail!("initial_backoff must be greater than 0");
        }

        if self.initial_backoff > self.max_backoff {
            anyhow::bail!("initial_backoff must not exceed max_backoff");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}
