//! Core domain types
//!
//! This module contains the snapshots and identifiers observed by a DAG client.
//! Every status value here is an immutable snapshot of remote state; a newer
//! fetch produces a new value rather than updating an old one.

pub mod application;
pub mod options;
pub mod status;
