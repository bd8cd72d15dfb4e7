//! Traversal positions and the nodes yielded by a traversal

use crate::graph::{Node, NodeId, Relationship};
use serde::Serialize;

/// How a non-start position was reached
#[derive(Debug, Clone)]
struct Step {
    previous: Node,
    relationship: Relationship,
}

/// Context for a single traversal step, handed to stop and returnable
/// evaluators.
///
/// The previous node and last relationship are stored together, so both are
/// absent at the start position and both present at every other depth.
#[derive(Debug, Clone)]
pub struct TraversalPosition {
    current: Node,
    step: Option<Step>,
    depth: u32,
    returned_count: u64,
}

impl TraversalPosition {
    pub(crate) fn start(node: Node) -> Self {
        Self {
            current: node,
            step: None,
            depth: 0,
            returned_count: 0,
        }
    }

    pub(crate) fn child(previous: Node, depth: u32, relationship: Relationship, node: Node) -> Self {
        Self {
            current: node,
            step: Some(Step {
                previous,
                relationship,
            }),
            depth,
            returned_count: 0,
        }
    }

    pub(crate) fn into_current(self) -> Node {
        self.current
    }

    pub(crate) fn set_returned_count(&mut self, count: u64) {
        self.returned_count = count;
    }

    pub fn current_node(&self) -> &Node {
        &self.current
    }

    /// Node this position was reached from; `None` at the start position
    pub fn previous_node(&self) -> Option<&Node> {
        self.step.as_ref().map(|s| &s.previous)
    }

    /// Relationship crossed to reach this position; `None` at the start position
    pub fn last_relationship(&self) -> Option<&Relationship> {
        self.step.as_ref().map(|s| &s.relationship)
    }

    /// Steps from the start node along the path taken (0 at the start)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of positions the traversal has returned so far
    pub fn returned_count(&self) -> u64 {
        self.returned_count
    }

    pub fn is_start(&self) -> bool {
        self.step.is_none()
    }
}

/// A node yielded by a traversal, carrying the position it was returned at
#[derive(Debug, Clone)]
pub struct TraversalNode {
    position: TraversalPosition,
}

impl TraversalNode {
    pub(crate) fn new(position: TraversalPosition) -> Self {
        Self { position }
    }

    pub fn node(&self) -> &Node {
        self.position.current_node()
    }

    pub fn id(&self) -> NodeId {
        self.position.current_node().id
    }

    pub fn depth(&self) -> u32 {
        self.position.depth()
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.node().property(key)
    }

    pub fn position(&self) -> &TraversalPosition {
        &self.position
    }

    pub fn into_position(self) -> TraversalPosition {
        self.position
    }

    pub fn into_node(self) -> Node {
        self.position.into_current()
    }
}

/// Serializable summary of a yielded node
#[derive(Debug, Clone, Serialize)]
pub struct TraversalRecord {
    pub node: Node,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    pub returned_count: u64,
}

impl From<&TraversalNode> for TraversalRecord {
    fn from(found: &TraversalNode) -> Self {
        let position = found.position();
        Self {
            node: found.node().clone(),
            depth: position.depth(),
            previous: position.previous_node().map(|n| n.id),
            via: position
                .last_relationship()
                .map(|r| r.rel_type().name().to_string()),
            returned_count: position.returned_count(),
        }
    }
}
