//! Named traversal declarations and their serializable form

use crate::descriptor::{Order, TraversalDescriptor};
use crate::error::{Error, Result};
use crate::evaluator::{ReturnableEvaluator, StopEvaluator};
use crate::relation::RelationshipTypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A (type, direction) pair as written in a catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    #[serde(rename = "type")]
    pub name: String,

    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    "both".to_string()
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: direction.into(),
        }
    }
}

/// Declarative stop evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopSpec {
    #[default]
    EndOfGraph,
    Depth(u32),
}

/// Declarative returnable evaluator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnSpec {
    #[default]
    AllNodes,
    AllButStartNode,
    /// Positions reached over a relationship of this type
    LastRelationshipType(String),
}

/// Serializable traversal declaration, resolved against a type registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSpec {
    pub name: String,

    #[serde(default)]
    pub order: Order,

    #[serde(default)]
    pub types: Vec<TypeSpec>,

    #[serde(default)]
    pub stop: StopSpec,

    #[serde(default)]
    pub returnable: ReturnSpec,

    #[serde(default)]
    pub expand_none: bool,
}

impl DescriptorSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: Order::default(),
            types: Vec::new(),
            stop: StopSpec::default(),
            returnable: ReturnSpec::default(),
            expand_none: false,
        }
    }

    pub fn resolve(&self, registry: &RelationshipTypeRegistry) -> Result<TraversalDescriptor> {
        let mut builder = TraversalDescriptor::builder(self.name.clone()).order(self.order);

        for spec in &self.types {
            let rel_type = registry.type_for(&spec.name)?;
            builder = builder.relationship(registry.with_direction_str(&rel_type, &spec.direction)?);
        }

        builder = builder.stop(match self.stop {
            StopSpec::EndOfGraph => StopEvaluator::EndOfGraph,
            StopSpec::Depth(depth) => StopEvaluator::at_depth(depth)?,
        });

        builder = builder.returnable(match &self.returnable {
            ReturnSpec::AllNodes => ReturnableEvaluator::AllNodes,
            ReturnSpec::AllButStartNode => ReturnableEvaluator::AllButStartNode,
            ReturnSpec::LastRelationshipType(name) => {
                let wanted = registry.type_for(name)?;
                ReturnableEvaluator::when(move |position| {
                    position
                        .last_relationship()
                        .is_some_and(|rel| rel.rel_type() == &wanted)
                })
            }
        });

        if self.expand_none {
            builder = builder.expand_none();
        }

        builder.build()
    }
}

/// Named, reusable traversal descriptors
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    descriptors: BTreeMap<String, TraversalDescriptor>,
}

impl DescriptorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every spec, failing on the first invalid or duplicate one
    pub fn from_specs<'a>(
        registry: &RelationshipTypeRegistry,
        specs: impl IntoIterator<Item = &'a DescriptorSpec>,
    ) -> Result<Self> {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.define(spec.resolve(registry)?)?;
        }
        tracing::debug!("Loaded {} traversal descriptors", catalog.len());
        Ok(catalog)
    }

    /// Add a descriptor under its name
    pub fn define(&mut self, descriptor: TraversalDescriptor) -> Result<()> {
        if self.descriptors.contains_key(descriptor.name()) {
            return Err(Error::Descriptor(format!(
                "traversal '{}' is already defined",
                descriptor.name()
            )));
        }
        self.descriptors
            .insert(descriptor.name().to_string(), descriptor);
        Ok(())
    }

    /// Add or overwrite a descriptor, returning the previous one
    pub fn replace(&mut self, descriptor: TraversalDescriptor) -> Option<TraversalDescriptor> {
        self.descriptors
            .insert(descriptor.name().to_string(), descriptor)
    }

    pub fn get(&self, name: &str) -> Result<&TraversalDescriptor> {
        self.descriptors
            .get(name)
            .ok_or_else(|| Error::UnknownDescriptor(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraversalDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
