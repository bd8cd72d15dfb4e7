//! Graph traversal engine

use crate::descriptor::{Order, TraversalDescriptor};
use crate::error::{Error, Result};
use crate::evaluator::{Evaluators, Predicate};
use crate::graph::{GraphSource, Node, NodeId};
use crate::position::{TraversalNode, TraversalPosition};
use crate::relation::DirectedType;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
    pub max_depth_reached: u32,
    pub nodes_returned: u64,
}

/// Pending positions: a queue for breadth first, a stack for depth first
enum Frontier {
    Queue(VecDeque<TraversalPosition>),
    Stack(Vec<TraversalPosition>),
}

impl Frontier {
    fn new(order: Order, start: TraversalPosition) -> Self {
        match order {
            Order::BreadthFirst => Self::Queue(VecDeque::from([start])),
            Order::DepthFirst => Self::Stack(vec![start]),
        }
    }

    fn pop(&mut self) -> Option<TraversalPosition> {
        match self {
            Self::Queue(queue) => queue.pop_front(),
            Self::Stack(stack) => stack.pop(),
        }
    }

    /// Add siblings so the first one is visited first among them
    fn extend(&mut self, children: Vec<TraversalPosition>) {
        match self {
            Self::Queue(queue) => queue.extend(children),
            Self::Stack(stack) => stack.extend(children.into_iter().rev()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Queue(queue) => queue.len(),
            Self::Stack(stack) => stack.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Exhausted,
    Failed,
}

/// A single-pass, pull-based walk over a graph source.
///
/// Owns its frontier, visited set and returned count; run a second walk by
/// instantiating the descriptor again. After an error the traversal is fused
/// and yields nothing further.
pub struct Traversal<S> {
    source: S,
    name: String,
    types: Vec<DirectedType>,
    evaluators: Evaluators,
    frontier: Frontier,
    visited: HashSet<NodeId>,
    pending: Option<(Node, u32)>,
    returned: u64,
    stats: TraversalStats,
    state: State,
}

impl<S: GraphSource> Traversal<S> {
    pub fn new(source: S, start: Node, descriptor: &TraversalDescriptor) -> Result<Self> {
        descriptor.validate_instantiation()?;

        tracing::debug!(
            "Starting traversal '{}': start={}, order={}, types={}, stop={}, returnable={}",
            descriptor.name(),
            start.id,
            descriptor.order(),
            descriptor.types().len(),
            descriptor.stop(),
            descriptor.returnable()
        );

        Ok(Self {
            source,
            name: descriptor.name().to_string(),
            types: descriptor.types().to_vec(),
            evaluators: descriptor.evaluators().clone(),
            frontier: Frontier::new(descriptor.order(), TraversalPosition::start(start)),
            visited: HashSet::new(),
            pending: None,
            returned: 0,
            stats: TraversalStats::default(),
            state: State::Running,
        })
    }

    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.state != State::Running
    }

    /// Advance to the next returnable position.
    ///
    /// Returns `Ok(None)` once the frontier is exhausted or after an error
    /// has been reported.
    pub fn try_next(&mut self) -> Result<Option<TraversalNode>> {
        if self.state != State::Running {
            return Ok(None);
        }
        match self.advance() {
            Ok(Some(found)) => Ok(Some(found)),
            Ok(None) => {
                self.state = State::Exhausted;
                tracing::debug!(
                    "Traversal '{}' exhausted: visited {} nodes, traversed {} edges, returned {}",
                    self.name,
                    self.stats.nodes_visited,
                    self.stats.edges_traversed,
                    self.stats.nodes_returned
                );
                Ok(None)
            }
            Err(err) => {
                self.state = State::Failed;
                tracing::warn!("Traversal '{}' failed: {}", self.name, err);
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<TraversalNode>> {
        if let Some((node, depth)) = self.pending.take() {
            self.expand(node, depth)?;
        }

        while let Some(mut position) = self.frontier.pop() {
            let id = position.current_node().id;
            if !self.visited.insert(id) {
                continue;
            }

            self.stats.nodes_visited += 1;
            self.stats.max_depth_reached = self.stats.max_depth_reached.max(position.depth());
            tracing::trace!(
                "Visiting node {} at depth {} (frontier: {})",
                id,
                position.depth(),
                self.frontier.len()
            );

            position.set_returned_count(self.returned);
            let returnable = evaluate(&self.evaluators.returnable, &position)?;
            if returnable {
                self.returned += 1;
                self.stats.nodes_returned = self.returned;
                position.set_returned_count(self.returned);
            }

            let stop = evaluate(&self.evaluators.stop, &position)?;

            if returnable {
                if !stop {
                    self.pending = Some((position.current_node().clone(), position.depth()));
                }
                return Ok(Some(TraversalNode::new(position)));
            }

            if !stop {
                let depth = position.depth();
                self.expand(position.into_current(), depth)?;
            }
        }

        Ok(None)
    }

    fn expand(&mut self, node: Node, depth: u32) -> Result<()> {
        let mut children = Vec::new();

        for directed in &self.types {
            let relationships = self
                .source
                .relationships_of(node.id, directed.rel_type(), directed.direction())
                .map_err(|source| Error::TraversalIo {
                    node: node.id,
                    source,
                })?;

            for rel in relationships {
                self.stats.edges_traversed += 1;

                let Some(other) = rel.other_end(node.id) else {
                    tracing::warn!(
                        "Skipping relationship {} ({}): it does not touch node {}",
                        rel.id,
                        rel.rel_type(),
                        node.id
                    );
                    continue;
                };

                if self.visited.contains(&other) {
                    continue;
                }

                let next = self
                    .source
                    .node(other)
                    .map_err(|source| Error::TraversalIo {
                        node: other,
                        source,
                    })?;
                children.push(TraversalPosition::child(node.clone(), depth + 1, rel, next));
            }
        }

        self.frontier.extend(children);
        Ok(())
    }
}

fn evaluate(predicate: &Predicate, position: &TraversalPosition) -> Result<bool> {
    predicate(position).map_err(|source| Error::Evaluator {
        node: position.current_node().id,
        source,
    })
}

impl<S: GraphSource> Iterator for Traversal<S> {
    type Item = Result<TraversalNode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

impl<S: GraphSource> std::iter::FusedIterator for Traversal<S> {}

/// Walk `source` from `start` as declared by `descriptor`
pub fn traverse<S: GraphSource>(
    source: S,
    start: Node,
    descriptor: &TraversalDescriptor,
) -> Result<Traversal<S>> {
    Traversal::new(source, start, descriptor)
}
