//! Error types for Waypoint Core

use crate::graph::NodeId;
use crate::limits::ValidationError;
use thiserror::Error;

/// Boxed error reported by a graph source or a caller-supplied predicate
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using Waypoint's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Waypoint error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error("Unknown traversal descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("Traversal I/O error at node {node}: {source}")]
    TraversalIo {
        node: NodeId,
        #[source]
        source: BoxError,
    },

    #[error("Evaluator error at node {node}: {source}")]
    Evaluator {
        node: NodeId,
        #[source]
        source: BoxError,
    },
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
