//! Stop and returnable evaluators
//!
//! A traversal consults two independent predicates per position: the stop
//! evaluator decides whether to expand past it, the returnable evaluator
//! decides whether to yield it. Evaluators can be built-in constants,
//! closures, or a single [`PositionEvaluator`] object; every shape is
//! resolved into an [`Evaluators`] pair when a descriptor is built.

use crate::error::{BoxError, Result};
use crate::limits::validate_stop_depth;
use crate::position::TraversalPosition;
use std::sync::Arc;

/// Outcome of a single predicate evaluation
pub type EvalResult = std::result::Result<bool, BoxError>;

/// Shared predicate over a traversal position
pub type Predicate = Arc<dyn Fn(&TraversalPosition) -> EvalResult + Send + Sync>;

/// Wrap a closure as a shared [`Predicate`]
pub fn predicate_fn<F>(f: F) -> Predicate
where
    F: Fn(&TraversalPosition) -> EvalResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Expand until the graph is exhausted
pub const STOP_AT_END_OF_GRAPH: StopEvaluator = StopEvaluator::EndOfGraph;

/// Return every visited node
pub const RETURN_ALL_NODES: ReturnableEvaluator = ReturnableEvaluator::AllNodes;

/// Return every visited node except the start node
pub const RETURN_ALL_BUT_START_NODE: ReturnableEvaluator = ReturnableEvaluator::AllButStartNode;

/// An object that evaluates one or both slots.
///
/// Evaluators must be referentially transparent; the engine does not promise
/// to call them exactly once per position.
pub trait PositionEvaluator: Send + Sync {
    /// Should the traversal stop expanding at this position?
    fn is_stop_node(&self, _position: &TraversalPosition) -> EvalResult {
        Ok(false)
    }

    /// Should the node at this position be returned?
    fn is_returnable(&self, _position: &TraversalPosition) -> EvalResult {
        Ok(true)
    }

    /// Whether this object should be bound to the stop slot
    fn evaluates_stop(&self) -> bool {
        true
    }

    /// Whether this object should be bound to the returnable slot
    fn evaluates_return(&self) -> bool {
        true
    }
}

/// Decides whether to expand past a position
#[derive(Clone)]
pub enum StopEvaluator {
    EndOfGraph,
    AtDepth(u32),
    Custom(Predicate),
}

impl StopEvaluator {
    /// Stop at positions whose depth is at least `depth`
    pub fn at_depth(depth: u32) -> Result<Self> {
        validate_stop_depth(depth)?;
        Ok(Self::AtDepth(depth))
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> EvalResult + Send + Sync + 'static,
    {
        Self::Custom(predicate_fn(f))
    }

    /// Infallible custom predicate
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> bool + Send + Sync + 'static,
    {
        Self::Custom(predicate_fn(move |position| Ok(f(position))))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            Self::EndOfGraph => predicate_fn(|_| Ok(false)),
            Self::AtDepth(limit) => {
                let limit = *limit;
                predicate_fn(move |position| Ok(position.depth() >= limit))
            }
            Self::Custom(f) => Arc::clone(f),
        }
    }
}

impl Default for StopEvaluator {
    fn default() -> Self {
        Self::EndOfGraph
    }
}

impl std::fmt::Debug for StopEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfGraph => write!(f, "EndOfGraph"),
            Self::AtDepth(depth) => write!(f, "AtDepth({})", depth),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl std::fmt::Display for StopEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfGraph => write!(f, "end of graph"),
            Self::AtDepth(depth) => write!(f, "depth {}", depth),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

/// Decides whether a position's node is yielded
#[derive(Clone)]
pub enum ReturnableEvaluator {
    AllNodes,
    AllButStartNode,
    Custom(Predicate),
}

impl ReturnableEvaluator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> EvalResult + Send + Sync + 'static,
    {
        Self::Custom(predicate_fn(f))
    }

    /// Infallible custom predicate
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> bool + Send + Sync + 'static,
    {
        Self::Custom(predicate_fn(move |position| Ok(f(position))))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            Self::AllNodes => predicate_fn(|_| Ok(true)),
            Self::AllButStartNode => predicate_fn(|position| Ok(position.depth() > 0)),
            Self::Custom(f) => Arc::clone(f),
        }
    }
}

impl Default for ReturnableEvaluator {
    fn default() -> Self {
        Self::AllNodes
    }
}

impl std::fmt::Debug for ReturnableEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllNodes => write!(f, "AllNodes"),
            Self::AllButStartNode => write!(f, "AllButStartNode"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl std::fmt::Display for ReturnableEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllNodes => write!(f, "all nodes"),
            Self::AllButStartNode => write!(f, "all but start node"),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

/// Stop predicate bound to a [`PositionEvaluator`] object
pub(crate) fn stop_from(evaluator: &Arc<dyn PositionEvaluator>) -> StopEvaluator {
    let evaluator = Arc::clone(evaluator);
    StopEvaluator::Custom(predicate_fn(move |position| evaluator.is_stop_node(position)))
}

/// Returnable predicate bound to a [`PositionEvaluator`] object
pub(crate) fn returnable_from(evaluator: &Arc<dyn PositionEvaluator>) -> ReturnableEvaluator {
    let evaluator = Arc::clone(evaluator);
    ReturnableEvaluator::Custom(predicate_fn(move |position| evaluator.is_returnable(position)))
}

/// Normalised evaluator pair used by the traversal loop
#[derive(Clone)]
pub struct Evaluators {
    pub stop: Predicate,
    pub returnable: Predicate,
}

impl Evaluators {
    pub fn new(stop: &StopEvaluator, returnable: &ReturnableEvaluator) -> Self {
        Self {
            stop: stop.predicate(),
            returnable: returnable.predicate(),
        }
    }
}

impl std::fmt::Debug for Evaluators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluators").finish_non_exhaustive()
    }
}
