//! Application record cache
//!
//! Holds the last application report successfully fetched from the resource
//! manager. Reads never block on the network and never fail; a failed refresh
//! keeps whatever was cached before, which may be nothing.

use std::sync::RwLock;

use dagwatch_core::domain::application::{ApplicationId, ApplicationReport};
use tracing::debug;

use crate::source::StatusSource;

#[derive(Debug)]
pub struct ApplicationRecordCache {
    application_id: ApplicationId,
    report: RwLock<Option<ApplicationReport>>,
}

impl ApplicationRecordCache {
    pub fn new(application_id: ApplicationId) -> Self {
        Self {
            application_id,
            report: RwLock::new(None),
        }
    }

    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Last cached report, possibly stale, `None` if no fetch ever succeeded
    pub fn get(&self) -> Option<ApplicationReport> {
        self.report
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Attempts one fetch and returns the cached report afterwards
    ///
    /// Failures are logged and swallowed.
    pub async fn refresh(&self, source: &dyn StatusSource) -> Option<ApplicationReport> {
        match source.fetch_application_report().await {
            Ok(report) if report.application_id != self.application_id => {
                debug!(
                    "Ignoring application report for {} (expected {})",
                    report.application_id, self.application_id
                );
            }
            Ok(report) => {
                *self
                    .report
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report);
            }
            Err(e) => {
                debug!(
                    "Failed to refresh application report for {}: {}",
                    self.application_id, e
                );
            }
        }
        self.get()
    }
}
