//! Progress rendering
//!
//! Turns status snapshots into human readable lines and remembers only what
//! was last rendered, so a line is emitted when something actually changed
//! rather than on every poll.

use std::collections::{BTreeMap, HashMap};

use dagwatch_core::domain::status::{DagState, DagStatus, VertexState, VertexStatus};
use tracing::info;

/// Destination for rendered progress lines
pub trait ProgressSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Sink that forwards lines to the `tracing` subscriber at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, line: &str) {
        info!("{}", line);
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// `DAG: State: RUNNING Progress: 50.0% [map 25.0%, reduce 75.0%]`
pub fn format_dag_line(status: &DagStatus) -> String {
    let mut line = format!("DAG: State: {}", status.state);
    if let Some(progress) = status.overall_progress() {
        line.push_str(&format!(" Progress: {}", percent(progress)));
    }
    if !status.vertex_progress.is_empty() {
        let vertices = status
            .vertex_progress
            .iter()
            .map(|(name, progress)| format!("{} {}", name, percent(*progress)))
            .collect::<Vec<_>>()
            .join(", ");
        line.push_str(&format!(" [{}]", vertices));
    }
    line
}

/// `  VertexStatus: VertexName: map State: RUNNING Progress: 50.0%`
pub fn format_vertex_line(status: &VertexStatus) -> String {
    let mut line = format!(
        "  VertexStatus: VertexName: {} State: {}",
        status.name, status.state
    );
    if let Some(progress) = status.progress {
        line.push_str(&format!(" Progress: {}", percent(progress)));
    }
    line
}

/// The parts of a DAG snapshot that decide whether it is worth re-rendering
#[derive(Debug, Clone, PartialEq)]
struct DagKey {
    state: DagState,
    progress: Option<f64>,
    vertex_progress: BTreeMap<String, f64>,
}

impl From<&DagStatus> for DagKey {
    fn from(status: &DagStatus) -> Self {
        Self {
            state: status.state,
            progress: status.progress,
            vertex_progress: status.vertex_progress.clone(),
        }
    }
}

/// Last rendered snapshot per DAG and per vertex, used purely for diffing
#[derive(Debug, Default)]
pub struct RenderTracker {
    last_dag: Option<DagKey>,
    last_vertex: HashMap<String, (VertexState, Option<f64>)>,
}

impl RenderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line to render if the DAG snapshot differs from the last one rendered
    pub fn dag_line(&mut self, status: &DagStatus) -> Option<String> {
        let key = DagKey::from(status);
        if self.last_dag.as_ref() == Some(&key) {
            return None;
        }
        self.last_dag = Some(key);
        Some(format_dag_line(status))
    }

    /// Returns the line to render if this vertex changed state or progress
    pub fn vertex_line(&mut self, status: &VertexStatus) -> Option<String> {
        let key = (status.state, status.progress);
        if self.last_vertex.get(&status.name) == Some(&key) {
            return None;
        }
        self.last_vertex.insert(status.name.clone(), key);
        Some(format_vertex_line(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dag_line_format() {
        let status = DagStatus::new(DagState::Running)
            .with_vertex("map", 0.25)
            .with_vertex("reduce", 0.75);
        assert_eq!(
            format_dag_line(&status),
            "DAG: State: RUNNING Progress: 50.0% [map 25.0%, reduce 75.0%]"
        );
        assert_eq!(
            format_dag_line(&DagStatus::new(DagState::Submitted)),
            "DAG: State: SUBMITTED"
        );
    }

    #[test]
    fn test_vertex_line_format() {
        let status = VertexStatus::new("map", VertexState::Running).with_progress(0.5);
        assert_eq!(
            format_vertex_line(&status),
            "  VertexStatus: VertexName: map State: RUNNING Progress: 50.0%"
        );
    }

    #[test]
    fn test_unchanged_dag_snapshot_renders_once() {
        let mut tracker = RenderTracker::new();
        let status = DagStatus::new(DagState::Running).with_progress(0.1);

        assert!(tracker.dag_line(&status).is_some());
        assert!(tracker.dag_line(&status.clone()).is_none());
        assert!(tracker.dag_line(&status.with_progress(0.5)).is_some());
    }

    #[test]
    fn test_diagnostics_alone_do_not_trigger_render() {
        let mut tracker = RenderTracker::new();
        let status = DagStatus::new(DagState::Running).with_progress(0.1);

        assert!(tracker.dag_line(&status).is_some());
        assert!(tracker.dag_line(&status.with_diagnostic("slow node")).is_none());
    }

    #[test]
    fn test_vertex_changes_tracked_per_name() {
        let mut tracker = RenderTracker::new();
        let map = VertexStatus::new("map", VertexState::Running).with_progress(0.2);
        let reduce = VertexStatus::new("reduce", VertexState::NotStarted);

        assert!(tracker.vertex_line(&map).is_some());
        assert!(tracker.vertex_line(&reduce).is_some());
        assert!(tracker.vertex_line(&map).is_none());
        assert!(tracker.vertex_line(&reduce).is_none());

        let reduce_running = VertexStatus::new("reduce", VertexState::Running);
        assert!(tracker.vertex_line(&reduce_running).is_some());
        assert!(tracker.vertex_line(&map).is_none());
    }
}
