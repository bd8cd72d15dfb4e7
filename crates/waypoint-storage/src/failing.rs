//! Graph source with configurable failure injection

use crate::error::StorageError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use waypoint_core::{BoxError, Direction, GraphSource, Node, NodeId, Relationship, RelationshipType};

/// One `relationships_of` call as seen by a [`FailingGraph`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub node: NodeId,
    pub rel_type: String,
    pub direction: Direction,
}

/// Source that delegates to another one but can inject failures.
///
/// Every `relationships_of` call is recorded, including failed ones. A call
/// fails when its node was registered with [`fail_on`](Self::fail_on), or
/// when its sequence number reaches the [`fail_at`](Self::fail_at) target
/// (0 = never).
pub struct FailingGraph<S> {
    inner: S,
    fail_nodes: Mutex<HashSet<NodeId>>,
    fail_at: AtomicU64,
    call_count: AtomicU64,
    calls: Mutex<Vec<RecordedCall>>,
}

impl<S> FailingGraph<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_nodes: Mutex::new(HashSet::new()),
            fail_at: AtomicU64::new(0),
            call_count: AtomicU64::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail every expansion of `node`
    pub fn fail_on(&self, node: NodeId) {
        self.fail_nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node);
    }

    /// Fail the `call`-th expansion and every one after it
    pub fn fail_at(&self, call: u64) {
        self.fail_at.store(call, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        self.fail_nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.fail_at.store(0, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Distinct nodes whose relationships were requested, in first-call order
    pub fn expanded_nodes(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.calls()
            .into_iter()
            .map(|call| call.node)
            .filter(|node| seen.insert(*node))
            .collect()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn should_fail(&self, node: NodeId) -> bool {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        let target = self.fail_at.load(Ordering::SeqCst);
        if target != 0 && count >= target {
            return true;
        }
        self.fail_nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&node)
    }
}

impl<S: GraphSource> GraphSource for FailingGraph<S> {
    fn node(&self, id: NodeId) -> Result<Node, BoxError> {
        self.inner.node(id)
    }

    fn relationships_of(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Vec<Relationship>, BoxError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                node,
                rel_type: rel_type.name().to_string(),
                direction,
            });

        if self.should_fail(node) {
            tracing::warn!("Injecting failure for relationships of node {}", node);
            return Err(StorageError::Injected(format!(
                "relationships of node {} ({}, {})",
                node, rel_type, direction
            ))
            .into());
        }
        self.inner.relationships_of(node, rel_type, direction)
    }
}
