//! Traversal catalog files
//!
//! A catalog is a TOML file with one `[[traversal]]` table per descriptor:
//!
//! ```toml
//! [[traversal]]
//! name = "friends"
//! returnable = "all_but_start_node"
//! types = [{ type = "knows", direction = "outgoing" }]
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use waypoint_core::{DescriptorCatalog, DescriptorSpec, RelationshipTypeRegistry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, rename = "traversal")]
    pub traversals: Vec<DescriptorSpec>,
}

impl CatalogFile {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let file = Self::parse(&content)
            .with_context(|| format!("Invalid catalog {}", path.display()))?;
        tracing::debug!(
            "Read {} traversal specs from {}",
            file.traversals.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn spec(&self, name: &str) -> Option<&DescriptorSpec> {
        self.traversals.iter().find(|spec| spec.name == name)
    }

    /// Build every descriptor against `registry`
    pub fn resolve(&self, registry: &RelationshipTypeRegistry) -> anyhow::Result<DescriptorCatalog> {
        Ok(DescriptorCatalog::from_specs(registry, &self.traversals)?)
    }
}
