//! Application master DTOs

use serde::{Deserialize, Serialize};

/// Reply to a kill request
///
/// `accepted` only means the application master queued the kill; the DAG
/// may keep running for a while afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillResponse {
    pub accepted: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the application master on non-2xx replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
