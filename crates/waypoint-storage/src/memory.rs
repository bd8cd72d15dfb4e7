//! In-memory property graph

use crate::error::{StorageError, StorageResult};
use crate::snapshot::GraphSnapshot;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use waypoint_core::{
    BoxError, Direction, GraphSource, Node, NodeId, Properties, Relationship, RelationshipId,
    RelationshipType, RelationshipTypeRegistry,
};

#[derive(Default)]
struct GraphData {
    nodes: BTreeMap<NodeId, Node>,
    relationships: BTreeMap<RelationshipId, Relationship>,
    /// Relationship ids touching each node, in creation order
    adjacency: HashMap<NodeId, Vec<RelationshipId>>,
    next_node: u64,
    next_relationship: u64,
}

impl GraphData {
    fn insert_node(&mut self, node: Node) -> StorageResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(StorageError::DuplicateNode(node.id));
        }
        self.next_node = self.next_node.max(node.id.0.saturating_add(1));
        self.adjacency.entry(node.id).or_default();
        self.nodes.insert(node.id, node);
        Ok(())
    }

    fn insert_relationship(&mut self, rel: Relationship) -> StorageResult<()> {
        if self.relationships.contains_key(&rel.id) {
            return Err(StorageError::DuplicateRelationship(rel.id));
        }
        for endpoint in [rel.start, rel.end] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(StorageError::NodeNotFound(endpoint));
            }
        }

        self.next_relationship = self.next_relationship.max(rel.id.0.saturating_add(1));
        self.adjacency.entry(rel.start).or_default().push(rel.id);
        if !rel.is_self_loop() {
            self.adjacency.entry(rel.end).or_default().push(rel.id);
        }
        self.relationships.insert(rel.id, rel);
        Ok(())
    }

    fn matching<'a>(
        &'a self,
        node: NodeId,
        types: &'a [RelationshipType],
        direction: Direction,
    ) -> StorageResult<impl Iterator<Item = &'a Relationship> + 'a> {
        let ids = self
            .adjacency
            .get(&node)
            .ok_or(StorageError::NodeNotFound(node))?;

        Ok(ids
            .iter()
            .filter_map(|id| self.relationships.get(id))
            .filter(move |rel| direction.matches(rel, node))
            .filter(move |rel| types.is_empty() || types.contains(rel.rel_type())))
    }
}

/// Node and relationship counts for a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub relationships: usize,
    /// Relationship count per type name
    pub types: BTreeMap<String, usize>,
}

/// In-memory property graph
///
/// Ids are assigned in creation order starting at 1. Relationships of a node
/// are reported in the order they were created.
pub struct MemoryGraph {
    data: RwLock<GraphData>,
    registry: RelationshipTypeRegistry,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(GraphData {
                next_node: 1,
                next_relationship: 1,
                ..GraphData::default()
            }),
            registry: RelationshipTypeRegistry::new(),
        }
    }

    /// Relationship types used by this graph
    pub fn registry(&self) -> &RelationshipTypeRegistry {
        &self.registry
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, GraphData>> {
        self.data
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, GraphData>> {
        self.data
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    // Nodes

    pub fn create_node(&self, properties: Properties) -> StorageResult<Node> {
        let mut data = self.write()?;
        let node = Node {
            id: NodeId(data.next_node),
            properties,
        };
        data.insert_node(node.clone())?;
        tracing::trace!("Created node {}", node.id);
        Ok(node)
    }

    pub fn get_node(&self, id: NodeId) -> StorageResult<Node> {
        self.read()?
            .nodes
            .get(&id)
            .cloned()
            .ok_or(StorageError::NodeNotFound(id))
    }

    pub fn set_property(
        &self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> StorageResult<()> {
        let mut data = self.write()?;
        let node = data
            .nodes
            .get_mut(&id)
            .ok_or(StorageError::NodeNotFound(id))?;
        node.properties.insert(key.into(), value.into());
        Ok(())
    }

    /// First node, by id, whose `key` property equals `value`
    pub fn find_node(&self, key: &str, value: &serde_json::Value) -> StorageResult<Option<Node>> {
        Ok(self
            .read()?
            .nodes
            .values()
            .find(|node| node.property(key) == Some(value))
            .cloned())
    }

    /// Remove a node. Fails while any relationship still touches it.
    pub fn delete_node(&self, id: NodeId) -> StorageResult<Node> {
        let mut data = self.write()?;
        let count = data
            .adjacency
            .get(&id)
            .ok_or(StorageError::NodeNotFound(id))?
            .len();
        if count > 0 {
            return Err(StorageError::NodeHasRelationships { node: id, count });
        }

        data.adjacency.remove(&id);
        let node = data.nodes.remove(&id).ok_or(StorageError::NodeNotFound(id))?;
        tracing::trace!("Deleted node {}", id);
        Ok(node)
    }

    // Relationships

    pub fn create_relationship(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: Properties,
    ) -> StorageResult<Relationship> {
        let rel_type = self.registry.type_for(rel_type)?;
        let mut data = self.write()?;
        let rel = Relationship {
            id: RelationshipId(data.next_relationship),
            rel_type,
            start,
            end,
            properties,
        };
        data.insert_relationship(rel.clone())?;
        tracing::trace!("Created relationship {} ({}): {} -> {}", rel.id, rel.rel_type, start, end);
        Ok(rel)
    }

    pub fn get_relationship(&self, id: RelationshipId) -> StorageResult<Relationship> {
        self.read()?
            .relationships
            .get(&id)
            .cloned()
            .ok_or(StorageError::RelationshipNotFound(id))
    }

    /// Relationships of `node` with any of `types` in `direction`.
    /// An empty `types` slice matches every type.
    pub fn relationships(
        &self,
        node: NodeId,
        types: &[RelationshipType],
        direction: Direction,
    ) -> StorageResult<Vec<Relationship>> {
        let data = self.read()?;
        let found = data.matching(node, types, direction)?.cloned().collect();
        Ok(found)
    }

    pub fn has_relationship(
        &self,
        node: NodeId,
        types: &[RelationshipType],
        direction: Direction,
    ) -> StorageResult<bool> {
        let data = self.read()?;
        let found = data.matching(node, types, direction)?.next().is_some();
        Ok(found)
    }

    /// The only relationship of `rel_type` in `direction`, if there is one
    pub fn single_relationship(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> StorageResult<Option<Relationship>> {
        let mut found = self.relationships(node, std::slice::from_ref(rel_type), direction)?;
        match found.len() {
            0 | 1 => Ok(found.pop()),
            count => Err(StorageError::MultipleRelationships {
                node,
                rel_type: rel_type.name().to_string(),
                count,
            }),
        }
    }

    pub fn delete_relationship(&self, id: RelationshipId) -> StorageResult<Relationship> {
        let mut data = self.write()?;
        let rel = data
            .relationships
            .remove(&id)
            .ok_or(StorageError::RelationshipNotFound(id))?;

        for endpoint in [rel.start, rel.end] {
            if let Some(ids) = data.adjacency.get_mut(&endpoint) {
                ids.retain(|other| *other != id);
            }
        }
        tracing::trace!("Deleted relationship {}", id);
        Ok(rel)
    }

    // Counts

    pub fn node_count(&self) -> StorageResult<usize> {
        Ok(self.read()?.nodes.len())
    }

    pub fn relationship_count(&self) -> StorageResult<usize> {
        Ok(self.read()?.relationships.len())
    }

    pub fn stats(&self) -> StorageResult<GraphStats> {
        let data = self.read()?;
        let mut types = BTreeMap::new();
        for rel in data.relationships.values() {
            *types.entry(rel.rel_type.name().to_string()).or_insert(0) += 1;
        }
        Ok(GraphStats {
            nodes: data.nodes.len(),
            relationships: data.relationships.len(),
            types,
        })
    }

    // Snapshots

    pub fn snapshot(&self) -> StorageResult<GraphSnapshot> {
        let data = self.read()?;
        Ok(GraphSnapshot {
            nodes: data.nodes.values().cloned().collect(),
            relationships: data.relationships.values().cloned().collect(),
        })
    }

    /// Build a graph from a snapshot, keeping its ids.
    ///
    /// Relationship types are interned through the new graph's registry.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> StorageResult<Self> {
        let graph = Self::new();
        {
            let mut data = graph.write()?;
            for node in snapshot.nodes {
                data.insert_node(node)?;
            }
            for mut rel in snapshot.relationships {
                rel.rel_type = graph.registry.type_for(rel.rel_type.name())?;
                data.insert_relationship(rel)?;
            }
        }
        Ok(graph)
    }

    pub fn load_json(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_snapshot(GraphSnapshot::load(path)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        self.snapshot()?.save(path)
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl GraphSource for MemoryGraph {
    fn node(&self, id: NodeId) -> Result<Node, BoxError> {
        Ok(self.get_node(id)?)
    }

    fn relationships_of(
        &self,
        node: NodeId,
        rel_type: &RelationshipType,
        direction: Direction,
    ) -> Result<Vec<Relationship>, BoxError> {
        Ok(self.relationships(node, std::slice::from_ref(rel_type), direction)?)
    }
}
