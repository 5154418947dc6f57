//! HTTP status source
//!
//! Talks JSON over HTTP to the application master for DAG and vertex status,
//! and to the resource manager for the application report.

use async_trait::async_trait;
use dagwatch_core::domain::application::{ApplicationId, ApplicationReport};
use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::{DagStatus, VertexStatus};
use dagwatch_core::dto::report::AppReportEnvelope;
use dagwatch_core::dto::status::{ErrorResponse, KillResponse};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{ClientError, Result};
use crate::source::StatusSource;

/// What a request was about, used to map a 404 to the right error kind
#[derive(Debug, Clone, Copy)]
enum Subject<'a> {
    Dag,
    Vertex(&'a str),
    Application,
}

/// Status source backed by the application master's and resource manager's REST APIs
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    /// Base URL of the application master (e.g., "http://am-host:10030")
    am_url: String,
    /// Base URL of the resource manager, if one is known
    rm_url: Option<String>,
    application_id: ApplicationId,
    /// HTTP client instance
    client: Client,
}

impl HttpStatusSource {
    /// Create a status source from configuration
    ///
    /// The reqwest client is built with the configured request timeout, which
    /// bounds how long any single status fetch can block the poll loop.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a status source with a custom HTTP client
    pub fn with_client(config: &SourceConfig, client: Client) -> Self {
        Self {
            am_url: config.am_url.trim_end_matches('/').to_string(),
            rm_url: config
                .rm_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            application_id: config.application_id,
            client,
        }
    }

    /// Get the base URL of the application master
    pub fn am_url(&self) -> &str {
        &self.am_url
    }

    fn dag_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.am_url)
            .map_err(|e| ClientError::remote(0, format!("Invalid AM URL '{}': {}", self.am_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::remote(0, format!("AM URL '{}' cannot be a base", self.am_url)))?
            .pop_if_empty()
            .extend(["ws", "v1", "dag"])
            .extend(tail);
        Ok(url)
    }

    /// Send a GET with the status options encoded in the query string
    async fn get_with_opts<T: DeserializeOwned>(
        &self,
        url: Url,
        opts: StatusGetOpts,
        subject: Subject<'_>,
    ) -> Result<T> {
        let mut request = self.client.get(url);
        if !opts.is_empty() {
            request = request.query(&[("opts", opts.to_query_value())]);
        }
        let response = request.send().await?;
        handle_response(response, subject).await
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_dag_status(&self, opts: StatusGetOpts) -> Result<DagStatus> {
        let url = self.dag_url(&["status"])?;
        self.get_with_opts(url, opts, Subject::Dag).await
    }

    async fn fetch_vertex_status(&self, name: &str, opts: StatusGetOpts) -> Result<VertexStatus> {
        let url = self.dag_url(&["vertices", name, "status"])?;
        self.get_with_opts(url, opts, Subject::Vertex(name)).await
    }

    async fn request_kill(&self) -> Result<()> {
        let url = self.dag_url(&["kill"])?;
        let response = self.client.post(url).send().await?;
        let reply: KillResponse = handle_response(response, Subject::Dag).await?;

        if !reply.accepted {
            return Err(ClientError::remote(
                200,
                reply
                    .message
                    .unwrap_or_else(|| "kill request rejected".to_string()),
            ));
        }
        Ok(())
    }

    async fn fetch_application_report(&self) -> Result<ApplicationReport> {
        let rm_url = self.rm_url.as_ref().ok_or_else(|| {
            ClientError::Transport("no resource manager URL configured".to_string())
        })?;
        let url = format!("{}/ws/v1/cluster/apps/{}", rm_url, self.application_id);
        let response = self.client.get(&url).send().await?;

        let envelope: AppReportEnvelope = handle_response(response, Subject::Application).await?;
        Ok(envelope.app)
    }

    fn close(&self) {
        debug!("Closing HTTP status source for {}", self.am_url);
    }
}

/// Check the status code and deserialize the JSON body
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    subject: Subject<'_>,
) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        return Err(classify_status(status.as_u16(), message, subject));
    }

    // body read failures (timeouts, dropped connections) stay retryable
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        ClientError::remote(
            status.as_u16(),
            format!("Failed to parse JSON response: {}", e),
        )
    })
}

/// Map a non-success HTTP status to the client error taxonomy
fn classify_status(status: u16, message: String, subject: Subject<'_>) -> ClientError {
    match (status, subject) {
        (404, Subject::Vertex(name)) => ClientError::NotFound(name.to_string()),
        (408 | 429 | 502 | 503 | 504, _) => {
            ClientError::Transport(format!("HTTP {}: {}", status, message))
        }
        _ => ClientError::remote(status, message),
    }
}
