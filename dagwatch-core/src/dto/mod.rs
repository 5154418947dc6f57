//! Data Transfer Objects
//!
//! DTOs describe the JSON bodies exchanged with the application master and the
//! resource manager. Status snapshots themselves travel as the domain types.

pub mod report;
pub mod status;
