//! Graph handles and the graph source trait

use crate::error::BoxError;
use crate::relation::{Direction, RelationshipType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Property map attached to nodes and relationships
pub type Properties = HashMap<String, serde_json::Value>;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub u64);

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node handle. Two nodes are equal when their ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// String property lookup, `None` when missing or not a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(|v| v.as_str())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A typed relationship between two nodes (self-loops allowed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,

    #[serde(rename = "type")]
    pub rel_type: RelationshipType,

    pub start: NodeId,

    pub end: NodeId,

    #[serde(default)]
    pub properties: Properties,
}

impl Relationship {
    pub fn new(id: RelationshipId, rel_type: RelationshipType, start: NodeId, end: NodeId) -> Self {
        Self {
            id,
            rel_type,
            start,
            end,
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.start == node {
            Some(self.end)
        } else if self.end == node {
            Some(self.start)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

/// Read access to a graph, as needed by the traversal engine.
///
/// Implemented by whatever owns the graph. Calls are synchronous from the
/// engine's point of view; errors are reported back to the caller of the
/// traversal unchanged.
pub trait GraphSource {
    /// Fetch a node by id
    fn node(&self, id: NodeId) -> Result<Node, BoxError>;

    /// Relationships of `node` with type `rel_type` in `direction`
    fn relationships_of(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Vec<Relationship>, BoxError>;
}

impl<T: GraphSource + ?Sized> GraphSource for &T {
    fn node(&self, id: NodeId) -> Result<Node, BoxError> {
        (**self).node(id)
    }

    fn relationships_of(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Vec<Relationship>, BoxError> {
        (**self).relationships_of(node, rel_type, direction)
    }
}

impl<T: GraphSource + ?Sized> GraphSource for Arc<T> {
    fn node(&self, id: NodeId) -> Result<Node, BoxError> {
        (**self).node(id)
    }

    fn relationships_of(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Vec<Relationship>, BoxError> {
        (**self).relationships_of(node, rel_type, direction)
    }
}
