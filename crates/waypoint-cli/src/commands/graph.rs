//! Graph commands

use clap::{Args, Subcommand};

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub command: GraphCommands,
}

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Show node and relationship counts
    Stats,
}

pub fn run(args: &GraphArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = ctx.load_graph()?;

    match &args.command {
        GraphCommands::Stats => {
            let stats = graph.stats()?;
            match ctx.format {
                OutputFormat::Json => println!("{}", to_json(&stats)?),
                OutputFormat::Table => {
                    println!("Nodes: {}", stats.nodes);
                    println!("Relationships: {}", stats.relationships);
                    if !stats.types.is_empty() {
                        println!("Relationship types:");
                        for (name, count) in &stats.types {
                            println!("  {}: {}", name, count);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
