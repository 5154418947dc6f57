//! Dagwatch Core
//!
//! Core types shared by the Dagwatch client and CLI.
//!
//! This crate contains:
//! - Domain types: DAG and vertex status snapshots, status options, application records
//! - DTOs: Wire shapes exchanged with the application master and resource manager

pub mod domain;
pub mod dto;
