//! CLI command implementations

pub mod catalog;
pub mod completions;
pub mod config;
pub mod graph;
pub mod run;
