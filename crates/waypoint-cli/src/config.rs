//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default location of the config file
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waypoint")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph snapshot used when `--graph` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<PathBuf>,

    /// Traversal catalog used when `--catalog` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: None,
            catalog: None,
            format: "table".to_string(),
        }
    }
}

impl Config {
    pub fn keys() -> &'static [&'static str] {
        &["graph", "catalog", "format"]
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.output_format()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn output_format(&self) -> anyhow::Result<OutputFormat> {
        self.format.parse()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "graph" => Some(display_path(self.graph.as_deref())),
            "catalog" => Some(display_path(self.catalog.as_deref())),
            "format" => Some(self.format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "graph" => self.graph = non_empty(value).map(PathBuf::from),
            "catalog" => self.catalog = non_empty(value).map(PathBuf::from),
            "format" => {
                let format: OutputFormat = value.parse()?;
                self.format = format.as_str().to_string();
            }
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
