//! Scripted collaborators for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dagwatch_core::domain::application::{
    ApplicationId, ApplicationReport, FinalApplicationStatus, YarnApplicationState,
};
use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::{DagState, DagStatus, VertexStatus};

use crate::clock::Clock;
use crate::error::{ClientError, Result};
use crate::render::ProgressSink;
use crate::source::StatusSource;

pub fn running(progress: f64) -> DagStatus {
    DagStatus::new(DagState::Running).with_progress(progress)
}

pub fn running_report(id: ApplicationId) -> ApplicationReport {
    ApplicationReport {
        application_id: id,
        host: Some("am-host".to_string()),
        tracking_url: Some(format!("http://rm:8088/proxy/{}/", id)),
        state: YarnApplicationState::Running,
        final_status: FinalApplicationStatus::Undefined,
        diagnostics: None,
        start_time: None,
        finish_time: None,
    }
}

/// Status source that replays scripted replies and counts calls
///
/// DAG replies are consumed strictly in order; running out fails the fetch.
/// Vertex replies repeat their last entry once the script is used up.
#[derive(Default)]
pub struct ScriptedSource {
    dag: Mutex<VecDeque<Result<DagStatus>>>,
    vertices: Mutex<HashMap<String, VecDeque<Result<VertexStatus>>>>,
    reports: Mutex<VecDeque<Result<ApplicationReport>>>,
    kills: Mutex<VecDeque<Result<()>>>,
    pub dag_calls: AtomicUsize,
    pub kill_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub vertex_calls: Mutex<Vec<String>>,
    pub opts_seen: Mutex<Vec<StatusGetOpts>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dag(replies: impl IntoIterator<Item = Result<DagStatus>>) -> Self {
        let source = Self::new();
        source.dag.lock().unwrap().extend(replies);
        source
    }

    pub fn push_vertex(&self, name: &str, reply: Result<VertexStatus>) {
        self.vertices
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn push_report(&self, reply: Result<ApplicationReport>) {
        self.reports.lock().unwrap().push_back(reply);
    }

    pub fn push_kill(&self, reply: Result<()>) {
        self.kills.lock().unwrap().push_back(reply);
    }

    pub fn dag_calls(&self) -> usize {
        self.dag_calls.load(Ordering::SeqCst)
    }

    pub fn vertex_calls(&self) -> Vec<String> {
        self.vertex_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_dag_status(&self, opts: StatusGetOpts) -> Result<DagStatus> {
        self.dag_calls.fetch_add(1, Ordering::SeqCst);
        self.opts_seen.lock().unwrap().push(opts);
        self.dag
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::remote(0, "script exhausted")))
    }

    async fn fetch_vertex_status(&self, name: &str, _opts: StatusGetOpts) -> Result<VertexStatus> {
        self.vertex_calls.lock().unwrap().push(name.to_string());
        let mut vertices = self.vertices.lock().unwrap();
        let Some(queue) = vertices.get_mut(name) else {
            return Err(ClientError::NotFound(name.to_string()));
        };
        match queue.len() {
            0 => Err(ClientError::NotFound(name.to_string())),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap(),
        }
    }

    async fn request_kill(&self) -> Result<()> {
        self.kill_calls.fetch_add(1, Ordering::SeqCst);
        self.kills.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn fetch_application_report(&self) -> Result<ApplicationReport> {
        self.reports
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no report scripted".into())))
    }

    fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clock that records requested sleeps and returns immediately
#[derive(Default)]
pub struct RecordingClock {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Sink that keeps every emitted line
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
