//! Resource manager DTOs

use serde::{Deserialize, Serialize};

use crate::domain::application::ApplicationReport;

/// Resource manager wraps a single application report under `app`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppReportEnvelope {
    pub app: ApplicationReport,
}
