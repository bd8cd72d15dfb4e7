//! Catalog commands

use clap::{Args, Subcommand};
use waypoint_core::{RelationshipTypeRegistry, TraversalDescriptor};

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List catalog traversals
    List,
    /// Show one traversal
    Show {
        /// Traversal name
        name: String,
    },
}

pub fn run(args: &CatalogArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let file = ctx.load_catalog()?;
    // Every entry is validated, even for `list`
    let registry = RelationshipTypeRegistry::new();
    let catalog = file.resolve(&registry)?;

    match &args.command {
        CatalogCommands::List => match ctx.format {
            OutputFormat::Json => println!("{}", to_json(&file.traversals)?),
            OutputFormat::Table => {
                if catalog.is_empty() {
                    println!("No traversals defined");
                    return Ok(());
                }
                println!("Traversals ({}):", catalog.len());
                for descriptor in catalog.iter() {
                    println!("  {} ({}; {})", descriptor.name(), descriptor.order(), type_list(descriptor));
                }
            }
        },
        CatalogCommands::Show { name } => {
            let descriptor = catalog.get(name)?;
            match (ctx.format, file.spec(name)) {
                (OutputFormat::Json, Some(spec)) => println!("{}", to_json(spec)?),
                _ => {
                    println!("Traversal: {}", descriptor.name());
                    println!("  Order: {}", descriptor.order());
                    println!("  Types: {}", type_list(descriptor));
                    println!("  Stop: {}", descriptor.stop());
                    println!("  Returnable: {}", descriptor.returnable());
                }
            }
        }
    }

    Ok(())
}

fn type_list(descriptor: &TraversalDescriptor) -> String {
    if descriptor.expands_none() {
        return "start node only".to_string();
    }
    descriptor
        .types()
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
