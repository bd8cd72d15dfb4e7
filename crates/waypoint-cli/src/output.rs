//! Output formatting utilities

use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use waypoint_core::{Node, TraversalRecord};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

/// Pretty JSON for `data`
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Short label for a node: its `name` property, or its id
pub fn node_label(node: &Node) -> String {
    node.property_str("name")
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", node.id))
}

/// Render traversal results as an aligned table
pub fn records_table(records: &[TraversalRecord]) -> String {
    let labels: Vec<String> = records.iter().map(|r| node_label(&r.node)).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0).max(4);

    let mut out = format!(
        "  {:<5} {:<6} {:<width$} {:<12} {}\n",
        "DEPTH",
        "ID",
        "NODE",
        "VIA",
        "FROM",
        width = width
    );
    for (record, label) in records.iter().zip(&labels) {
        out.push_str(&format!(
            "  {:<5} {:<6} {:<width$} {:<12} {}\n",
            record.depth,
            record.node.id,
            label,
            record.via.as_deref().unwrap_or("-"),
            record
                .previous
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            width = width
        ));
    }
    out
}
