//! DAG client facade
//!
//! `DagClient` is bound to one running DAG for its whole lifetime. It is
//! read-only with respect to the DAG apart from the kill request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dagwatch_core::domain::application::{ApplicationId, ApplicationReport};
use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::{DagStatus, VertexStatus};
use tracing::{debug, info};

use crate::clock::{Clock, TokioClock};
use crate::config::{MonitorConfig, SourceConfig};
use crate::error::{ClientError, Result};
use crate::http::HttpStatusSource;
use crate::monitor::{CompletionMonitor, VertexSelection};
use crate::render::{ProgressSink, TracingSink};
use crate::report::ApplicationRecordCache;
use crate::source::StatusSource;

/// Guarded view of the status source
///
/// Fails every call once closed, and falls back to the resource manager's
/// report when the application master cannot be reached.
struct Channel {
    source: Arc<dyn StatusSource>,
    records: ApplicationRecordCache,
    closed: AtomicBool,
}

impl Channel {
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::ClientClosed);
        }
        Ok(())
    }

    /// Terminal status derived from the application report, if the application has finished
    async fn status_from_report(&self) -> Option<DagStatus> {
        let report = self.records.refresh(self.source.as_ref()).await?;
        let state = report.terminal_dag_state()?;

        let mut status = DagStatus::new(state);
        status.diagnostics.extend(report.diagnostics);
        Some(status)
    }
}

#[async_trait]
impl StatusSource for Channel {
    async fn fetch_dag_status(&self, opts: StatusGetOpts) -> Result<DagStatus> {
        self.ensure_open()?;
        match self.source.fetch_dag_status(opts).await {
            Err(e) if e.is_retryable() => match self.status_from_report().await {
                Some(status) => {
                    info!(
                        "Application master unreachable ({}), using resource manager state {}",
                        e, status.state
                    );
                    Ok(status)
                }
                None => Err(e),
            },
            other => other,
        }
    }

    async fn fetch_vertex_status(&self, name: &str, opts: StatusGetOpts) -> Result<VertexStatus> {
        self.ensure_open()?;
        self.source.fetch_vertex_status(name, opts).await
    }

    async fn request_kill(&self) -> Result<()> {
        self.ensure_open()?;
        self.source.request_kill().await
    }

    async fn fetch_application_report(&self) -> Result<ApplicationReport> {
        self.ensure_open()?;
        self.source.fetch_application_report().await
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.source.close();
        }
    }
}

/// Client for monitoring and controlling one DAG running in a remote application master
///
/// Getters may be called concurrently; at most one `wait_for_completion*`
/// call per client is supported at a time.
pub struct DagClient {
    channel: Channel,
    config: MonitorConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ProgressSink>,
}

impl DagClient {
    /// Create a client over an arbitrary status source
    ///
    /// Progress lines go to `tracing` and waits use the tokio timer until
    /// replaced with [`DagClient::with_sink`] / [`DagClient::with_clock`].
    pub fn new(
        source: Arc<dyn StatusSource>,
        application_id: ApplicationId,
        config: MonitorConfig,
    ) -> Self {
        Self {
            channel: Channel {
                source,
                records: ApplicationRecordCache::new(application_id),
                closed: AtomicBool::new(false),
            },
            config,
            clock: Arc::new(TokioClock),
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a client talking HTTP to the application master and resource manager
    pub fn connect(source: &SourceConfig, config: MonitorConfig) -> Result<Self> {
        let http = HttpStatusSource::new(source)?;
        Ok(Self::new(Arc::new(http), source.application_id, config))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Application the DAG runs in; fixed at construction
    pub fn application_id(&self) -> ApplicationId {
        self.channel.records.application_id()
    }

    /// Last known application report
    ///
    /// May be stale and is `None` until a refresh succeeds. Never blocks and
    /// never fails.
    pub fn application_report(&self) -> Option<ApplicationReport> {
        self.channel.records.get()
    }

    /// Try to fetch a newer application report, keeping the old one on failure
    pub async fn refresh_application_report(&self) -> Option<ApplicationReport> {
        if self.channel.ensure_open().is_err() {
            return self.application_report();
        }
        self.channel.records.refresh(&self.channel).await
    }

    /// Tracking URL from the cached application report
    pub fn web_ui_address(&self) -> Option<String> {
        self.application_report()
            .and_then(|report| report.tracking_url)
    }

    /// Fetch the current DAG status
    pub async fn get_dag_status(&self, opts: StatusGetOpts) -> Result<DagStatus> {
        self.channel.fetch_dag_status(opts).await
    }

    /// Fetch the current status of one vertex
    ///
    /// Fails with [`ClientError::NotFound`] if the DAG has no such vertex.
    pub async fn get_vertex_status(&self, name: &str, opts: StatusGetOpts) -> Result<VertexStatus> {
        self.channel.fetch_vertex_status(name, opts).await
    }

    /// Ask the application master to kill the DAG
    ///
    /// Returns once the request is accepted; the DAG may still be running.
    /// Not retried.
    pub async fn try_kill_dag(&self) -> Result<()> {
        info!("Requesting kill of DAG in {}", self.application_id());
        self.channel.request_kill().await
    }

    /// Wait for the DAG to finish, rendering only DAG-level progress
    pub async fn wait_for_completion(&self) -> Result<DagStatus> {
        self.wait(VertexSelection::None, StatusGetOpts::empty()).await
    }

    /// Wait for the DAG to finish, also rendering the named vertices
    ///
    /// `None` for `vertex_names` behaves exactly like [`DagClient::wait_for_completion`]
    /// with the given options.
    pub async fn wait_for_completion_with_status_updates(
        &self,
        vertex_names: Option<&[&str]>,
        opts: Option<StatusGetOpts>,
    ) -> Result<DagStatus> {
        let selection = match vertex_names {
            Some(names) => VertexSelection::named(names.iter().copied()),
            None => VertexSelection::None,
        };
        self.wait(selection, opts.unwrap_or_default()).await
    }

    /// Wait for the DAG to finish, rendering every vertex it reports
    pub async fn wait_for_completion_with_all_status_updates(
        &self,
        opts: Option<StatusGetOpts>,
    ) -> Result<DagStatus> {
        self.wait(VertexSelection::All, opts.unwrap_or_default())
            .await
    }

    async fn wait(&self, selection: VertexSelection, opts: StatusGetOpts) -> Result<DagStatus> {
        self.channel.ensure_open()?;
        debug!(
            "Waiting for DAG completion in {} (vertices: {:?}, opts: {:?})",
            self.application_id(),
            selection,
            opts
        );
        self.refresh_application_report().await;

        let monitor = CompletionMonitor::new(
            &self.channel,
            self.clock.as_ref(),
            self.sink.as_ref(),
            &self.config,
        );
        let result = monitor.run(&selection, opts).await;

        self.refresh_application_report().await;
        result
    }

    /// Release the connection to the status source
    ///
    /// Safe to call more than once; later calls do nothing. Any operation
    /// after closing, including an in-progress wait, fails with
    /// [`ClientError::ClientClosed`] on its next fetch.
    pub fn close(&self) {
        self.channel.close();
    }

    pub fn is_closed(&self) -> bool {
        self.channel.closed.load(Ordering::SeqCst)
    }
}

impl Drop for DagClient {
    fn drop(&mut self) {
        self.close();
    }
}
