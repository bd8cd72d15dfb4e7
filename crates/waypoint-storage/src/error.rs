//! Storage error types

use thiserror::Error;
use waypoint_core::{NodeId, RelationshipId};

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("Duplicate relationship id: {0}")]
    DuplicateRelationship(RelationshipId),

    #[error("Node {node} still has {count} relationships")]
    NodeHasRelationships { node: NodeId, count: usize },

    #[error("Node {node} has {count} '{rel_type}' relationships, expected at most one")]
    MultipleRelationships {
        node: NodeId,
        rel_type: String,
        count: usize,
    },

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Injected failure: {0}")]
    Injected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] waypoint_core::Error),
}
