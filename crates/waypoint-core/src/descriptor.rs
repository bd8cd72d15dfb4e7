//! Reusable traversal declarations

use crate::error::{Error, Result};
use crate::evaluator::{
    predicate_fn, returnable_from, stop_from, EvalResult, Evaluators, PositionEvaluator,
    ReturnableEvaluator, StopEvaluator,
};
use crate::graph::{GraphSource, Node};
use crate::limits::{validate_descriptor_name, validate_type_count};
use crate::position::TraversalPosition;
use crate::relation::DirectedType;
use crate::traversal::Traversal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Order in which positions are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    BreadthFirst,
    DepthFirst,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth_first",
            Self::DepthFirst => "depth_first",
        }
    }
}

impl std::str::FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breadth_first" | "breadth-first" | "bfs" => Ok(Self::BreadthFirst),
            "depth_first" | "depth-first" | "dfs" => Ok(Self::DepthFirst),
            other => Err(Error::InvalidArgument(format!("unknown order: {}", other))),
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, immutable traversal declaration.
///
/// Instantiate it against any start node with [`traverse`](Self::traverse);
/// each instantiation gets its own frontier and visited set.
#[derive(Clone)]
pub struct TraversalDescriptor {
    name: String,
    types: Vec<DirectedType>,
    order: Order,
    stop: StopEvaluator,
    returnable: ReturnableEvaluator,
    declared_stop: StopEvaluator,
    declared_returnable: ReturnableEvaluator,
    expand_none: bool,
    evaluators: Evaluators,
}

impl TraversalDescriptor {
    pub fn builder(name: impl Into<String>) -> TraversalDescriptorBuilder {
        TraversalDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[DirectedType] {
        &self.types
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn stop(&self) -> &StopEvaluator {
        &self.stop
    }

    pub fn returnable(&self) -> &ReturnableEvaluator {
        &self.returnable
    }

    /// Whether this descriptor deliberately never expands the start node
    pub fn expands_none(&self) -> bool {
        self.expand_none
    }

    pub(crate) fn evaluators(&self) -> &Evaluators {
        &self.evaluators
    }

    /// Builder pre-populated with every field of this descriptor.
    ///
    /// Inherited custom evaluators keep precedence over declared constants
    /// and may be replaced once by a new custom evaluator.
    pub fn to_builder(&self) -> TraversalDescriptorBuilder {
        TraversalDescriptorBuilder {
            name: self.name.clone(),
            types: self.types.clone(),
            order: self.order,
            stop: self.declared_stop.clone(),
            returnable: self.declared_returnable.clone(),
            stop_override: self.stop.is_custom().then(|| self.stop.clone()),
            return_override: self.returnable.is_custom().then(|| self.returnable.clone()),
            stop_inherited: self.stop.is_custom(),
            return_inherited: self.returnable.is_custom(),
            expand_none: self.expand_none,
            conflicts: Vec::new(),
        }
    }

    pub fn renamed(&self, name: impl Into<String>) -> Result<Self> {
        self.to_builder().name(name).build()
    }

    /// Check the descriptor can be run
    pub fn validate_instantiation(&self) -> Result<()> {
        if self.types.is_empty() && !self.expand_none {
            return Err(Error::Descriptor(format!(
                "traversal '{}' declares no relationship types; call expand_none() to only consider the start node",
                self.name
            )));
        }
        Ok(())
    }

    /// Start a traversal of `source` from `start`
    pub fn traverse<S: GraphSource>(&self, source: S, start: Node) -> Result<Traversal<S>> {
        Traversal::new(source, start, self)
    }
}

impl std::fmt::Debug for TraversalDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalDescriptor")
            .field("name", &self.name)
            .field("types", &self.types)
            .field("order", &self.order)
            .field("stop", &self.stop)
            .field("returnable", &self.returnable)
            .field("expand_none", &self.expand_none)
            .finish()
    }
}

/// Builder for [`TraversalDescriptor`]
pub struct TraversalDescriptorBuilder {
    name: String,
    types: Vec<DirectedType>,
    order: Order,
    stop: StopEvaluator,
    returnable: ReturnableEvaluator,
    stop_override: Option<StopEvaluator>,
    return_override: Option<ReturnableEvaluator>,
    stop_inherited: bool,
    return_inherited: bool,
    expand_none: bool,
    conflicts: Vec<String>,
}

impl TraversalDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            order: Order::default(),
            stop: StopEvaluator::default(),
            returnable: ReturnableEvaluator::default(),
            stop_override: None,
            return_override: None,
            stop_inherited: false,
            return_inherited: false,
            expand_none: false,
            conflicts: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Follow relationships of this type and direction
    pub fn relationship(mut self, directed: DirectedType) -> Self {
        self.types.push(directed);
        self
    }

    pub fn types(mut self, types: impl IntoIterator<Item = DirectedType>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn breadth_first(self) -> Self {
        self.order(Order::BreadthFirst)
    }

    pub fn depth_first(self) -> Self {
        self.order(Order::DepthFirst)
    }

    /// Declared stop evaluator; a custom `is_stop_node` takes precedence
    pub fn stop(mut self, stop: StopEvaluator) -> Self {
        self.stop = stop;
        self
    }

    /// Declared returnable evaluator; a custom `is_returnable` takes precedence
    pub fn returnable(mut self, returnable: ReturnableEvaluator) -> Self {
        self.returnable = returnable;
        self
    }

    pub fn is_stop_node<F>(self, f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> EvalResult + Send + Sync + 'static,
    {
        self.override_stop(StopEvaluator::Custom(predicate_fn(f)))
    }

    pub fn is_returnable<F>(self, f: F) -> Self
    where
        F: Fn(&TraversalPosition) -> EvalResult + Send + Sync + 'static,
    {
        self.override_returnable(ReturnableEvaluator::Custom(predicate_fn(f)))
    }

    /// Bind one object to every slot it evaluates
    pub fn evaluator(mut self, evaluator: Arc<dyn PositionEvaluator>) -> Self {
        let stop = evaluator.evaluates_stop();
        let returns = evaluator.evaluates_return();
        if !stop && !returns {
            self.conflicts
                .push("illegal evaluator: evaluates neither stop nor returnable".to_string());
            return self;
        }
        if stop {
            self = self.override_stop(stop_from(&evaluator));
        }
        if returns {
            self = self.override_returnable(returnable_from(&evaluator));
        }
        self
    }

    /// Declare that the traversal only considers the start node
    pub fn expand_none(mut self) -> Self {
        self.expand_none = true;
        self
    }

    fn override_stop(mut self, stop: StopEvaluator) -> Self {
        if self.stop_override.is_some() && !self.stop_inherited {
            self.conflicts
                .push("stop slot assigned more than one custom evaluator".to_string());
        }
        self.stop_override = Some(stop);
        self.stop_inherited = false;
        self
    }

    fn override_returnable(mut self, returnable: ReturnableEvaluator) -> Self {
        if self.return_override.is_some() && !self.return_inherited {
            self.conflicts
                .push("returnable slot assigned more than one custom evaluator".to_string());
        }
        self.return_override = Some(returnable);
        self.return_inherited = false;
        self
    }

    pub fn build(self) -> Result<TraversalDescriptor> {
        validate_descriptor_name(&self.name)?;
        validate_type_count(self.types.len())?;

        if let Some(conflict) = self.conflicts.first() {
            return Err(Error::Descriptor(format!("{}: {}", self.name, conflict)));
        }
        if self.expand_none && !self.types.is_empty() {
            return Err(Error::Descriptor(format!(
                "{}: expand_none() conflicts with {} declared relationship types",
                self.name,
                self.types.len()
            )));
        }

        let stop = self.stop_override.unwrap_or_else(|| self.stop.clone());
        let returnable = self
            .return_override
            .unwrap_or_else(|| self.returnable.clone());
        let evaluators = Evaluators::new(&stop, &returnable);

        tracing::trace!(
            "Built traversal descriptor '{}' ({} types, {}, stop: {}, returnable: {})",
            self.name,
            self.types.len(),
            self.order,
            stop,
            returnable
        );

        Ok(TraversalDescriptor {
            name: self.name,
            types: self.types,
            order: self.order,
            stop,
            returnable,
            declared_stop: self.stop,
            declared_returnable: self.returnable,
            expand_none: self.expand_none,
            evaluators,
        })
    }
}
