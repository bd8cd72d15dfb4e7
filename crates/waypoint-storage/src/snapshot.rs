//! JSON graph snapshots

use crate::error::StorageResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use waypoint_core::{Node, Relationship};

/// Serializable contents of a graph.
///
/// ```json
/// {
///   "nodes": [{"id": 1, "properties": {"name": "Thomas"}}],
///   "relationships": [{"id": 1, "type": "knows", "start": 1, "end": 2}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        tracing::debug!(
            "Read snapshot {}: {} nodes, {} relationships",
            path.display(),
            snapshot.nodes.len(),
            snapshot.relationships.len()
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
