//! DAG and vertex status snapshots

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a DAG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DagState {
    Submitted,
    Initing,
    Running,
    Succeeded,
    Failed,
    Killed,
    Error,
}

impl DagState {
    /// Whether no further progress can occur from this state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DagState::Succeeded | DagState::Failed | DagState::Killed | DagState::Error
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DagState::Submitted => "SUBMITTED",
            DagState::Initing => "INITING",
            DagState::Running => "RUNNING",
            DagState::Succeeded => "SUCCEEDED",
            DagState::Failed => "FAILED",
            DagState::Killed => "KILLED",
            DagState::Error => "ERROR",
        }
    }
}

impl fmt::Display for DagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a single vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VertexState {
    NotStarted,
    Submitted,
    Initing,
    Running,
    Succeeded,
    Failed,
    Killed,
    Error,
}

impl VertexState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            VertexState::Succeeded
                | VertexState::Failed
                | VertexState::Killed
                | VertexState::Error
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VertexState::NotStarted => "NOT_STARTED",
            VertexState::Submitted => "SUBMITTED",
            VertexState::Initing => "INITING",
            VertexState::Running => "RUNNING",
            VertexState::Succeeded => "SUCCEEDED",
            VertexState::Failed => "FAILED",
            VertexState::Killed => "KILLED",
            VertexState::Error => "ERROR",
        }
    }
}

impl fmt::Display for VertexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter values grouped by counter group, then by counter name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<String, BTreeMap<String, i64>>);

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single counter value
    pub fn get(&self, group: &str, name: &str) -> Option<i64> {
        self.0.get(group).and_then(|g| g.get(name)).copied()
    }

    /// Set a counter value, creating the group if needed
    pub fn insert(&mut self, group: impl Into<String>, name: impl Into<String>, value: i64) {
        self.0
            .entry(group.into())
            .or_default()
            .insert(name.into(), value);
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, i64>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Application master memory usage, returned only when requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub max_bytes: u64,
}

/// Snapshot of a DAG's status
///
/// Produced fresh by every fetch and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagStatus {
    pub state: DagState,
    /// Overall completion in `[0.0, 1.0]`, when the remote reports it
    #[serde(default)]
    pub progress: Option<f64>,
    /// Completion per vertex name
    #[serde(default)]
    pub vertex_progress: BTreeMap<String, f64>,
    /// Present only if counters were requested
    #[serde(default)]
    pub counters: Option<Counters>,
    #[serde(default)]
    pub memory_usage: Option<MemoryUsage>,
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl DagStatus {
    /// Bare status with no optional data attached
    pub fn new(state: DagState) -> Self {
        Self {
            state,
            progress: None,
            vertex_progress: BTreeMap::new(),
            counters: None,
            memory_usage: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_vertex(mut self, name: impl Into<String>, progress: f64) -> Self {
        self.vertex_progress.insert(name.into(), progress);
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Names of the vertices this snapshot knows about
    pub fn vertex_names(&self) -> impl Iterator<Item = &str> {
        self.vertex_progress.keys().map(String::as_str)
    }

    /// Overall completion, falling back to the mean of vertex progress
    pub fn overall_progress(&self) -> Option<f64> {
        if self.progress.is_some() {
            return self.progress;
        }
        if self.vertex_progress.is_empty() {
            return None;
        }
        let sum: f64 = self.vertex_progress.values().sum();
        Some(sum / self.vertex_progress.len() as f64)
    }
}

/// Snapshot of a single vertex's status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexStatus {
    pub name: String,
    pub state: VertexState,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub counters: Option<Counters>,
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl VertexStatus {
    pub fn new(name: impl Into<String>, state: VertexState) -> Self {
        Self {
            name: name.into(),
            state,
            progress: None,
            counters: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }
}
