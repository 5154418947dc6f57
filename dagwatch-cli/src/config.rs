//! Configuration module
//!
//! Combines the connection settings from the command line with the monitor
//! tunables from the environment.

use std::time::Duration;

use anyhow::{Context, Result};
use dagwatch_client::{DagClient, MonitorConfig, SourceConfig};
use dagwatch_core::domain::application::ApplicationId;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How to reach the application master and resource manager
    pub source: SourceConfig,
    /// Poll loop settings
    pub monitor: MonitorConfig,
}

impl Config {
    pub fn new(
        am_url: String,
        rm_url: Option<String>,
        application_id: ApplicationId,
        request_timeout_secs: u64,
        monitor: MonitorConfig,
    ) -> Self {
        let mut source = SourceConfig::new(am_url, application_id);
        source.rm_url = rm_url;
        source.request_timeout = Duration::from_secs(request_timeout_secs);
        Self { source, monitor }
    }

    pub fn validate(&self) -> Result<()> {
        self.source.validate().context("Invalid connection settings")?;
        self.monitor.validate().context("Invalid monitor settings")?;
        Ok(())
    }

    /// Build a client for the configured DAG
    pub fn client(&self) -> Result<DagClient> {
        DagClient::connect(&self.source, self.monitor.clone())
            .context("Failed to create DAG client")
    }
}
