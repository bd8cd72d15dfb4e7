//! Waypoint Storage - Graph sources for the traversal engine
//!
//! This crate provides an in-memory property graph that implements
//! [`waypoint_core::GraphSource`], JSON snapshots for loading and saving
//! it, and a failure-injecting wrapper for exercising error paths.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod failing;
pub mod memory;
pub mod snapshot;

pub use error::{StorageError, StorageResult};
pub use failing::{FailingGraph, RecordedCall};
pub use memory::{GraphStats, MemoryGraph};
pub use snapshot::GraphSnapshot;
