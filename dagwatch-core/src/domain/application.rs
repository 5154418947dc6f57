//! Application identity and the resource manager's application report

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::DagState;

const APPLICATION_PREFIX: &str = "application";

/// Error returned when parsing an [`ApplicationId`] fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid application id '{input}': {reason}")]
pub struct ParseApplicationIdError {
    input: String,
    reason: &'static str,
}

/// Cluster-assigned application identifier, e.g. `application_1700000000000_0042`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicationId {
    cluster_timestamp: u64,
    sequence: u32,
}

impl ApplicationId {
    pub const fn new(cluster_timestamp: u64, sequence: u32) -> Self {
        Self {
            cluster_timestamp,
            sequence,
        }
    }

    pub fn cluster_timestamp(&self) -> u64 {
        self.cluster_timestamp
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{:04}",
            APPLICATION_PREFIX, self.cluster_timestamp, self.sequence
        )
    }
}

impl FromStr for ApplicationId {
    type Err = ParseApplicationIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseApplicationIdError {
            input: input.to_string(),
            reason,
        };

        let mut parts = input.split('_');
        if parts.next() != Some(APPLICATION_PREFIX) {
            return Err(err("expected 'application_' prefix"));
        }
        let cluster_timestamp = parts
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| err("cluster timestamp is not a number"))?;
        let sequence = parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| err("sequence is not a number"))?;
        if parts.next().is_some() {
            return Err(err("unexpected trailing component"));
        }

        Ok(Self::new(cluster_timestamp, sequence))
    }
}

impl TryFrom<String> for ApplicationId {
    type Error = ParseApplicationIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApplicationId> for String {
    fn from(id: ApplicationId) -> Self {
        id.to_string()
    }
}

/// Application state as tracked by the resource manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YarnApplicationState {
    New,
    NewSaving,
    Submitted,
    Accepted,
    Running,
    Finished,
    Failed,
    Killed,
}

impl YarnApplicationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            YarnApplicationState::Finished
                | YarnApplicationState::Failed
                | YarnApplicationState::Killed
        )
    }
}

/// Outcome reported by the application once it has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalApplicationStatus {
    Undefined,
    Succeeded,
    Failed,
    Killed,
}

/// Coarse application descriptor held by the resource manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationReport {
    pub application_id: ApplicationId,
    pub host: Option<String>,
    pub tracking_url: Option<String>,
    pub state: YarnApplicationState,
    pub final_status: FinalApplicationStatus,
    #[serde(default)]
    pub diagnostics: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
}

impl ApplicationReport {
    /// DAG state implied by a finished application, `None` while it still runs
    pub fn terminal_dag_state(&self) -> Option<DagState> {
        if !self.state.is_terminal() {
            return None;
        }
        let state = match (self.state, self.final_status) {
            (YarnApplicationState::Finished, FinalApplicationStatus::Succeeded) => {
                DagState::Succeeded
            }
            (YarnApplicationState::Finished, FinalApplicationStatus::Killed)
            | (YarnApplicationState::Killed, _) => DagState::Killed,
            (YarnApplicationState::Finished, FinalApplicationStatus::Failed)
            | (YarnApplicationState::Failed, _) => DagState::Failed,
            (YarnApplicationState::Finished, FinalApplicationStatus::Undefined) => DagState::Error,
            _ => return None,
        };
        Some(state)
    }
}
