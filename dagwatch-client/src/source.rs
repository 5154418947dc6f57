//! Status source port
//!
//! The client never executes DAG work; everything it knows comes through this
//! trait. Implementations own the connection and its timeouts.

use async_trait::async_trait;
use dagwatch_core::domain::application::ApplicationReport;
use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::{DagStatus, VertexStatus};

use crate::error::Result;

/// Remote endpoint that can report on, and be asked to kill, one DAG
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches a fresh DAG status snapshot
    ///
    /// Fails with `Transport` (retryable) or `Remote` (non-retryable).
    async fn fetch_dag_status(&self, opts: StatusGetOpts) -> Result<DagStatus>;

    /// Fetches a fresh status snapshot for one vertex
    ///
    /// Fails with `NotFound` when `name` is not a vertex of the DAG.
    async fn fetch_vertex_status(&self, name: &str, opts: StatusGetOpts) -> Result<VertexStatus>;

    /// Asks the application master to kill the DAG
    ///
    /// Success means the request was accepted, not that the DAG has stopped.
    async fn request_kill(&self) -> Result<()>;

    /// Fetches the application report from the resource manager
    async fn fetch_application_report(&self) -> Result<ApplicationReport>;

    /// Releases held connections. Called at most once by the owning client.
    fn close(&self) {}
}
