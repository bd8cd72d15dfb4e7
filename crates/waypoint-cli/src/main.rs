//! Waypoint CLI - Run declarative traversals over a graph file

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod catalog;
mod commands;
mod config;
mod output;

use catalog::CatalogFile;
use commands::{catalog as catalog_cmd, completions, config as config_cmd, graph, run};
use config::{config_file_path, Config};
use output::OutputFormat;
use waypoint_storage::MemoryGraph;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(author, version, about = "Declarative graph traversals")]
pub struct Cli {
    /// Graph snapshot (JSON)
    #[arg(short, long, global = true, env = "WAYPOINT_GRAPH")]
    pub graph: Option<PathBuf>,

    /// Traversal catalog (TOML)
    #[arg(short, long, global = true, env = "WAYPOINT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Config file
    #[arg(long, global = true, env = "WAYPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a named traversal from the catalog
    Run(run::RunArgs),
    /// Run a traversal declared on the command line
    Traverse(run::TraverseArgs),
    /// Inspect the traversal catalog
    Catalog(catalog_cmd::CatalogArgs),
    /// Inspect the graph
    Graph(graph::GraphArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Settings resolved from flags and the config file
pub struct AppContext {
    pub graph_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub format: OutputFormat,
}

impl AppContext {
    /// Read the config file and merge it under the command line flags
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load(&cli.config_path())?;
        Self::new(cli, &config)
    }

    pub fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let format = match cli.format {
            Some(format) => format,
            None => config.output_format()?,
        };

        Ok(Self {
            graph_path: cli.graph.clone().or_else(|| config.graph.clone()),
            catalog_path: cli.catalog.clone().or_else(|| config.catalog.clone()),
            format,
        })
    }

    pub fn load_graph(&self) -> anyhow::Result<MemoryGraph> {
        let path = required(self.graph_path.as_deref(), "graph")?;
        tracing::debug!("Loading graph from {}", path.display());
        let graph = MemoryGraph::load_json(path)
            .with_context(|| format!("Failed to load graph {}", path.display()))?;
        tracing::info!(
            "Loaded {} nodes and {} relationships",
            graph.node_count()?,
            graph.relationship_count()?
        );
        Ok(graph)
    }

    pub fn load_catalog(&self) -> anyhow::Result<CatalogFile> {
        let path = required(self.catalog_path.as_deref(), "catalog")?;
        CatalogFile::load(path)
    }
}

fn required<'a>(path: Option<&'a Path>, what: &str) -> anyhow::Result<&'a Path> {
    path.with_context(|| {
        format!(
            "No {what} file given; pass --{what} or set `{what}` in the config file"
        )
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting waypoint CLI");

    match &cli.command {
        Commands::Run(args) => run::run(args, &AppContext::load(&cli)?)?,
        Commands::Traverse(args) => run::traverse(args, &AppContext::load(&cli)?)?,
        Commands::Catalog(args) => catalog_cmd::run(args, &AppContext::load(&cli)?)?,
        Commands::Graph(args) => graph::run(args, &AppContext::load(&cli)?)?,
        Commands::Config(args) => config_cmd::run(args, &cli.config_path())?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
