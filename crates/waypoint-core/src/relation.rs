//! Relationship types, directions and the type registry

use crate::error::{Error, Result};
use crate::graph::{NodeId, Relationship};
use crate::limits::validate_type_name;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

/// Direction for graph traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
            Self::Both => "both",
        }
    }

    /// The same direction seen from the other endpoint
    pub fn reverse(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
            Self::Both => Self::Both,
        }
    }

    /// Whether `rel` leaves, enters or touches `node` in this direction
    pub fn matches(self, rel: &Relationship, node: NodeId) -> bool {
        match self {
            Self::Outgoing => rel.start == node,
            Self::Incoming => rel.end == node,
            Self::Both => rel.start == node || rel.end == node,
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "outgoing" | "out" => Ok(Self::Outgoing),
            "incoming" | "in" => Ok(Self::Incoming),
            "both" | "undirected" | "any" => Ok(Self::Both),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named relationship type.
///
/// Equality, ordering and hashing go by name, so a type obtained from the
/// registry and one read back from a snapshot compare equal. Prefer
/// [`RelationshipTypeRegistry::type_for`] so repeated lookups share storage.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipType(Arc<str>);

impl RelationshipType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RelationshipType({:?})", self.name())
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq<str> for RelationshipType {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}

impl PartialEq<&str> for RelationshipType {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}

impl Serialize for RelationshipType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for RelationshipType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(name))
    }
}

/// A relationship type qualified with the direction it is followed in.
///
/// Two views over the same type with different directions are
/// [`same_type`](Self::same_type) but not equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectedType {
    rel_type: RelationshipType,
    direction: Direction,
}

impl DirectedType {
    pub fn new(rel_type: RelationshipType, direction: Direction) -> Self {
        Self {
            rel_type,
            direction,
        }
    }

    pub fn rel_type(&self) -> &RelationshipType {
        &self.rel_type
    }

    pub fn name(&self) -> &str {
        self.rel_type.name()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn same_type(&self, other: &DirectedType) -> bool {
        self.rel_type == other.rel_type
    }
}

impl std::fmt::Display for DirectedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.rel_type, self.direction)
    }
}

/// Interning registry for relationship types.
///
/// Owned by a graph source and lives as long as it does. Entries are never
/// evicted; the set of names is bounded by the graph's schema.
#[derive(Debug, Default)]
pub struct RelationshipTypeRegistry {
    types: RwLock<HashMap<String, RelationshipType>>,
}

impl RelationshipTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the canonical type for `name`, creating it on first use
    pub fn type_for(&self, name: &str) -> Result<RelationshipType> {
        validate_type_name(name)?;

        {
            let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(rel_type) = types.get(name) {
                return Ok(rel_type.clone());
            }
        }

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let rel_type = types
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::trace!("Registered relationship type: {}", name);
                RelationshipType::new(name)
            })
            .clone();
        Ok(rel_type)
    }

    pub fn with_direction(&self, rel_type: &RelationshipType, direction: Direction) -> DirectedType {
        DirectedType::new(rel_type.clone(), direction)
    }

    /// Like [`with_direction`](Self::with_direction), parsing the direction token
    pub fn with_direction_str(&self, rel_type: &RelationshipType, direction: &str) -> Result<DirectedType> {
        Ok(self.with_direction(rel_type, direction.parse()?))
    }

    pub fn outgoing(&self, name: &str) -> Result<DirectedType> {
        Ok(DirectedType::new(self.type_for(name)?, Direction::Outgoing))
    }

    pub fn incoming(&self, name: &str) -> Result<DirectedType> {
        Ok(DirectedType::new(self.type_for(name)?, Direction::Incoming))
    }

    pub fn both(&self, name: &str) -> Result<DirectedType> {
        Ok(DirectedType::new(self.type_for(name)?, Direction::Both))
    }

    /// Parse `name[:direction]`; the direction defaults to both
    pub fn parse_directed(&self, spec: &str) -> Result<DirectedType> {
        match spec.rsplit_once(':') {
            Some((name, direction)) => {
                let rel_type = self.type_for(name.trim())?;
                self.with_direction_str(&rel_type, direction)
            }
            None => self.both(spec.trim()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
