//! Persistent defaults for `--graph`, `--catalog` and `--format`

use std::path::Path;

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the stored default for graph, catalog or format
    Get {
        /// One of: graph, catalog, format
        key: String,
    },
    /// Store a default used when the matching flag is omitted
    Set {
        /// One of: graph, catalog, format
        key: String,
        /// Snapshot or catalog path, or table/json; an empty path clears it
        value: String,
    },
    /// Print every stored default
    #[command(alias = "list")]
    Show,
    /// Print where defaults are read from (WAYPOINT_CONFIG overrides it)
    Path,
    /// Write a config file with no graph or catalog and table output
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, path: &Path) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            let config = Config::load(path)?;
            println!("{}", lookup(&config, key)?);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(path)?;
            config.set(key, value)?;
            config.save(path)?;
            tracing::info!("Stored {} default in {}", key, path.display());
            println!("{} = {}", key, lookup(&config, key)?);
        }
        ConfigCommands::Show => {
            let config = Config::load(path)?;
            println!("Defaults from {}", path.display());
            print!("{}", render(&config));
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to reset graph, catalog and format",
                    path.display()
                );
            }
            Config::default()
                .save(path)
                .with_context(|| format!("Could not initialise {}", path.display()))?;
            println!("Wrote waypoint defaults to {}", path.display());
        }
    }
    Ok(())
}

fn lookup(config: &Config, key: &str) -> anyhow::Result<String> {
    config.get(key).with_context(|| {
        format!(
            "Unknown config key: {} (expected {})",
            key,
            Config::keys().join(", ")
        )
    })
}

/// One `key = value` line per default, in declaration order
fn render(config: &Config) -> String {
    Config::keys()
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}\n", key, value)))
        .collect()
}
