//! Waypoint Core - Declarative graph traversal
//!
//! This crate provides the traversal engine for the Waypoint graph
//! toolkit: relationship type interning, stop/returnable evaluators,
//! reusable traversal descriptors, and a lazy breadth-first or
//! depth-first walk over any [`GraphSource`].

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod limits;
pub mod position;
pub mod relation;
pub mod traversal;

pub use catalog::{DescriptorCatalog, DescriptorSpec, ReturnSpec, StopSpec, TypeSpec};
pub use descriptor::{Order, TraversalDescriptor, TraversalDescriptorBuilder};
pub use error::{BoxError, Error, Result};
pub use evaluator::{
    predicate_fn, EvalResult, Evaluators, PositionEvaluator, Predicate, ReturnableEvaluator,
    StopEvaluator, RETURN_ALL_BUT_START_NODE, RETURN_ALL_NODES, STOP_AT_END_OF_GRAPH,
};
pub use graph::{GraphSource, Node, NodeId, Properties, Relationship, RelationshipId};
pub use position::{TraversalNode, TraversalPosition, TraversalRecord};
pub use relation::{Direction, DirectedType, RelationshipType, RelationshipTypeRegistry};
pub use traversal::{traverse, Traversal, TraversalStats};
