//! Dagwatch Client
//!
//! Observes and controls a DAG running inside a remote application master.
//!
//! The client never runs DAG work itself. It polls the application master for
//! status snapshots, renders progress as it changes, survives short outages
//! with bounded retries, and can ask for the DAG to be killed. When the
//! application master is gone, the resource manager's application report is
//! used to tell how the DAG ended.
//!
//! # Example
//!
//! ```no_run
//! use dagwatch_client::{DagClient, MonitorConfig, SourceConfig};
//! use dagwatch_core::domain::application::ApplicationId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_id: ApplicationId = "application_1700000000000_0001".parse()?;
//!     let source = SourceConfig::new("http://am-host:10030", app_id)
//!         .with_rm_url("http://rm-host:8088");
//!
//!     let client = DagClient::connect(&source, MonitorConfig::default())?;
//!     let status = client.wait_for_completion().await?;
//!
//!     println!("DAG finished: {}", status.state);
//!     client.close();
//!     Ok(())
//! }
//! ```

pub mod clock;
mod client;
pub mod config;
pub mod error;
mod http;
pub mod monitor;
pub mod render;
mod report;
pub mod source;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use client::DagClient;
pub use config::{BackoffPolicy, MonitorConfig, SourceConfig};
pub use error::{ClientError, Result};
pub use http::HttpStatusSource;
pub use monitor::{CompletionMonitor, VertexSelection};
pub use render::{ProgressSink, TracingSink};
pub use report::ApplicationRecordCache;
pub use source::StatusSource;
