//! Blueprint Assign: triage actionable emails into a tracked task list.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod triage;
