//! Completion monitor
//!
//! Drives the poll loop behind every `wait_for_completion*` call:
//!
//! ```text
//! Polling --terminal status--> Terminal
//!    |  ^ \--non-retryable error--> Aborted
//!    |  |
//!    v  | (delay elapsed)
//! Backoff --retries exhausted--> Aborted
//! ```
//!
//! Only the terminal flag of a fetched status ends the loop; progress numbers
//! are rendered but never used to infer completion.

use std::collections::BTreeSet;

use dagwatch_core::domain::options::StatusGetOpts;
use dagwatch_core::domain::status::{DagState, DagStatus};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::MonitorConfig;
use crate::error::{ClientError, Result};
use crate::render::{ProgressSink, RenderTracker};
use crate::source::StatusSource;

/// Which vertices get their own progress lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VertexSelection {
    /// DAG-level progress only
    #[default]
    None,
    /// The named vertices
    Named(BTreeSet<String>),
    /// Every vertex the DAG reports on the current poll
    All,
}

impl VertexSelection {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(names.into_iter().map(Into::into).collect())
    }

    fn resolve(&self, status: &DagStatus) -> Vec<String> {
        match self {
            VertexSelection::None => Vec::new(),
            VertexSelection::Named(names) => names.iter().cloned().collect(),
            VertexSelection::All => status.vertex_names().map(str::to_string).collect(),
        }
    }
}

enum PollState {
    Polling,
    Backoff(ClientError),
    Terminal(DagStatus),
    Aborted(ClientError),
}

/// Poll loop over a status source
///
/// Holds no status between calls; the only snapshot kept during a run is the
/// last rendered one, for diffing.
pub struct CompletionMonitor<'a> {
    source: &'a dyn StatusSource,
    clock: &'a dyn Clock,
    sink: &'a dyn ProgressSink,
    config: &'a MonitorConfig,
}

impl<'a> CompletionMonitor<'a> {
    pub fn new(
        source: &'a dyn StatusSource,
        clock: &'a dyn Clock,
        sink: &'a dyn ProgressSink,
        config: &'a MonitorConfig,
    ) -> Self {
        Self {
            source,
            clock,
            sink,
            config,
        }
    }

    /// Polls until the DAG reports a terminal state or communication gives up
    ///
    /// `opts` apply unchanged to every fetch, including the final one.
    pub async fn run(&self, selection: &VertexSelection, opts: StatusGetOpts) -> Result<DagStatus> {
        let backoff = self.config.backoff();
        let mut tracker = RenderTracker::new();
        let mut retries = 0u32;
        let mut announced = false;
        let mut state = PollState::Polling;

        loop {
            state = match state {
                PollState::Polling => match self.source.fetch_dag_status(opts).await {
                    Ok(status) if status.is_terminal() => PollState::Terminal(status),
                    Ok(status) => {
                        retries = 0;
                        let initializing =
                            matches!(status.state, DagState::Submitted | DagState::Initing);
                        if !announced && !initializing {
                            announced = true;
                            info!("DAG initialized: CurrentState={}", status.state);
                        }
                        self.render(&mut tracker, &status, selection, opts).await;
                        self.clock.sleep(self.config.poll_interval).await;
                        PollState::Polling
                    }
                    Err(e) if e.is_retryable() => PollState::Backoff(e),
                    Err(e) => PollState::Aborted(e),
                },
                PollState::Backoff(e) => {
                    if retries >= self.config.max_retries {
                        PollState::Aborted(e)
                    } else {
                        retries += 1;
                        let delay = backoff.delay_for(retries);
                        warn!(
                            "Failed to fetch DAG status (retry {}/{} in {:?}): {}",
                            retries, self.config.max_retries, delay, e
                        );
                        self.clock.sleep(delay).await;
                        PollState::Polling
                    }
                }
                PollState::Terminal(status) => {
                    info!("DAG completed. FinalState={}", status.state);
                    if status.state != DagState::Succeeded {
                        for diagnostic in &status.diagnostics {
                            warn!("DAG diagnostics: {}", diagnostic);
                        }
                    }
                    return Ok(status);
                }
                PollState::Aborted(e) => {
                    error!("Giving up waiting for DAG completion: {}", e);
                    return Err(e);
                }
            };
        }
    }

    /// Emits the DAG line and changed vertex lines for one successful poll
    ///
    /// Vertex fetch failures are logged and skipped.
    async fn render(
        &self,
        tracker: &mut RenderTracker,
        status: &DagStatus,
        selection: &VertexSelection,
        opts: StatusGetOpts,
    ) {
        if let Some(line) = tracker.dag_line(status) {
            self.sink.emit(&line);
        } else {
            debug!("DAG status unchanged ({})", status.state);
        }

        for name in selection.resolve(status) {
            match self.source.fetch_vertex_status(&name, opts).await {
                Ok(vertex) => {
                    if let Some(line) = tracker.vertex_line(&vertex) {
                        self.sink.emit(&line);
                    }
                }
                Err(e) => warn!("Skipping status for vertex {}: {}", name, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingClock, RecordingSink, ScriptedSource, running};
    use dagwatch_core::domain::status::{VertexState, VertexStatus};
    use std::time::Duration;

    fn config() -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(100),
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(25),
        }
    }

    fn transport() -> ClientError {
        ClientError::Transport("connection reset".into())
    }

    async fn run(
        source: &ScriptedSource,
        selection: VertexSelection,
    ) -> (Result<DagStatus>, Vec<String>, Vec<Duration>) {
        let clock = RecordingClock::default();
        let sink = RecordingSink::default();
        let config = config();
        let monitor = CompletionMonitor::new(source, &clock, &sink, &config);
        let result = monitor.run(&selection, StatusGetOpts::empty()).await;
        (result, sink.lines(), clock.sleeps())
    }

    #[tokio::test]
    async fn test_returns_terminal_status_and_stops_fetching() {
        let terminal = DagStatus::new(DagState::Failed).with_diagnostic("vertex map failed");
        let source = ScriptedSource::with_dag([Ok(running(0.3)), Ok(terminal.clone())]);

        let (result, _, _) = run(&source, VertexSelection::None).await;

        assert_eq!(result.unwrap(), terminal);
        assert_eq!(source.dag_calls(), 2);
    }

    #[tokio::test]
    async fn test_renders_only_distinct_snapshots() {
        let source = ScriptedSource::with_dag([
            Ok(running(0.1)),
            Ok(running(0.1)),
            Ok(running(0.5)),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);

        let (result, lines, sleeps) = run(&source, VertexSelection::None).await;

        assert_eq!(result.unwrap().state, DagState::Succeeded);
        assert_eq!(
            lines,
            vec![
                "DAG: State: RUNNING Progress: 10.0%".to_string(),
                "DAG: State: RUNNING Progress: 50.0%".to_string(),
            ]
        );
        assert_eq!(source.dag_calls(), 4);
        assert_eq!(sleeps, vec![Duration::from_millis(100); 3]);
    }

    #[tokio::test]
    async fn test_state_change_alone_triggers_render() {
        let source = ScriptedSource::with_dag([
            Ok(DagStatus::new(DagState::Submitted)),
            Ok(DagStatus::new(DagState::Submitted)),
            Ok(DagStatus::new(DagState::Running)),
            Ok(DagStatus::new(DagState::Killed)),
        ]);

        let (result, lines, _) = run(&source, VertexSelection::None).await;

        assert_eq!(result.unwrap().state, DagState::Killed);
        assert_eq!(lines, vec!["DAG: State: SUBMITTED", "DAG: State: RUNNING"]);
    }

    #[tokio::test]
    async fn test_aborts_after_exactly_max_retries() {
        let source = ScriptedSource::with_dag((0..10).map(|_| Err(transport())));

        let (result, _, sleeps) = run(&source, VertexSelection::None).await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        // one initial attempt plus three retries
        assert_eq!(source.dag_calls(), 4);
        assert_eq!(
            sleeps,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(25),
            ]
        );
    }

    #[tokio::test]
    async fn test_recovers_within_retry_bound_and_resets_counter() {
        let source = ScriptedSource::with_dag([
            Err(transport()),
            Err(transport()),
            Err(transport()),
            Ok(running(0.2)),
            Err(transport()),
            Err(transport()),
            Err(transport()),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);

        let (result, _, _) = run(&source, VertexSelection::None).await;

        assert_eq!(result.unwrap().state, DagState::Succeeded);
        assert_eq!(source.dag_calls(), 8);
    }

    #[tokio::test]
    async fn test_remote_error_aborts_without_retry() {
        let source = ScriptedSource::with_dag([
            Ok(running(0.2)),
            Err(ClientError::remote(404, "DAG not found")),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);

        let (result, _, sleeps) = run(&source, VertexSelection::None).await;

        assert!(matches!(result, Err(ClientError::Remote { status: 404, .. })));
        assert_eq!(source.dag_calls(), 2);
        assert_eq!(sleeps, vec![Duration::from_millis(100)]);
    }

    #[tokio::test]
    async fn test_named_vertices_render_on_change_and_skip_failures() {
        let source = ScriptedSource::with_dag([
            Ok(running(0.1)),
            Ok(running(0.1)),
            Ok(running(0.6)),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);
        source.push_vertex(
            "map",
            Ok(VertexStatus::new("map", VertexState::Running).with_progress(0.2)),
        );
        source.push_vertex(
            "map",
            Ok(VertexStatus::new("map", VertexState::Running).with_progress(0.2)),
        );
        source.push_vertex(
            "map",
            Ok(VertexStatus::new("map", VertexState::Succeeded).with_progress(1.0)),
        );

        let (result, lines, _) = run(&source, VertexSelection::named(["map", "missing"])).await;

        assert_eq!(result.unwrap().state, DagState::Succeeded);
        assert_eq!(
            lines,
            vec![
                "DAG: State: RUNNING Progress: 10.0%",
                "  VertexStatus: VertexName: map State: RUNNING Progress: 20.0%",
                "DAG: State: RUNNING Progress: 60.0%",
                "  VertexStatus: VertexName: map State: SUCCEEDED Progress: 100.0%",
            ]
        );
        // three non-terminal polls, two vertices each, none on the terminal poll
        assert_eq!(source.vertex_calls().len(), 6);
    }

    #[tokio::test]
    async fn test_all_vertices_resolved_from_each_poll() {
        let source = ScriptedSource::with_dag([
            Ok(DagStatus::new(DagState::Running).with_vertex("map", 0.5)),
            Ok(DagStatus::new(DagState::Running)
                .with_vertex("map", 1.0)
                .with_vertex("reduce", 0.0)),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);
        source.push_vertex("map", Ok(VertexStatus::new("map", VertexState::Running)));
        source.push_vertex("reduce", Ok(VertexStatus::new("reduce", VertexState::NotStarted)));

        let (result, _, _) = run(&source, VertexSelection::All).await;

        assert!(result.is_ok());
        assert_eq!(source.vertex_calls(), vec!["map", "map", "reduce"]);
    }

    #[tokio::test]
    async fn test_options_apply_to_every_poll() {
        let source = ScriptedSource::with_dag([
            Ok(running(0.1)),
            Ok(DagStatus::new(DagState::Succeeded)),
        ]);
        let clock = RecordingClock::default();
        let sink = RecordingSink::default();
        let config = config();
        let monitor = CompletionMonitor::new(&source, &clock, &sink, &config);

        monitor
            .run(&VertexSelection::None, StatusGetOpts::GET_COUNTERS)
            .await
            .unwrap();

        assert_eq!(
            *source.opts_seen.lock().unwrap(),
            vec![StatusGetOpts::GET_COUNTERS; 2]
        );
    }
}
