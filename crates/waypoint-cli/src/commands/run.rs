//! Traversal commands

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use waypoint_core::{
    Node, NodeId, Order, StopEvaluator, TraversalDescriptor, TraversalRecord, TraversalStats,
    RETURN_ALL_BUT_START_NODE,
};
use waypoint_storage::MemoryGraph;

use crate::output::{node_label, records_table, to_json, OutputFormat};
use crate::AppContext;

/// Where a traversal starts
#[derive(Args)]
pub struct StartArgs {
    /// Start node: a numeric id, or a value of the --by property
    #[arg(short, long)]
    pub start: String,

    /// Property matched when --start is not a numeric id
    #[arg(long, default_value = "name")]
    pub by: String,

    /// Stop after this many results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Catalog traversal name
    pub name: String,

    #[command(flatten)]
    pub start: StartArgs,
}

#[derive(Args)]
pub struct TraverseArgs {
    #[command(flatten)]
    pub start: StartArgs,

    /// Relationship type to follow, as name[:direction] (repeatable)
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Traversal order: bfs or dfs
    #[arg(short, long, default_value = "bfs")]
    pub order: String,

    /// Stop expanding at this depth
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Leave the start node out of the results
    #[arg(long)]
    pub all_but_start: bool,
}

#[derive(Serialize)]
struct RunReport {
    traversal: String,
    start: NodeId,
    nodes: Vec<TraversalRecord>,
    stats: TraversalStats,
}

pub fn run(args: &RunArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = ctx.load_graph()?;
    let catalog = ctx.load_catalog()?.resolve(graph.registry())?;
    let descriptor = catalog.get(&args.name)?;

    execute(&graph, descriptor, &args.start, ctx.format)
}

pub fn traverse(args: &TraverseArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let graph = ctx.load_graph()?;
    let registry = graph.registry();

    let mut builder = TraversalDescriptor::builder("inline").order(args.order.parse::<Order>()?);
    for spec in &args.types {
        builder = builder.relationship(registry.parse_directed(spec)?);
    }
    if args.types.is_empty() {
        builder = builder.expand_none();
    }
    if let Some(depth) = args.depth {
        builder = builder.stop(StopEvaluator::at_depth(depth)?);
    }
    if args.all_but_start {
        builder = builder.returnable(RETURN_ALL_BUT_START_NODE);
    }

    execute(&graph, &builder.build()?, &args.start, ctx.format)
}

/// Find the start node by id, or by property value
fn resolve_start(graph: &MemoryGraph, args: &StartArgs) -> anyhow::Result<Node> {
    if let Ok(id) = args.start.parse::<u64>() {
        return Ok(graph.get_node(NodeId(id))?);
    }

    graph
        .find_node(&args.by, &serde_json::Value::String(args.start.clone()))?
        .with_context(|| format!("No node with {} = '{}'", args.by, args.start))
}

fn execute(
    graph: &MemoryGraph,
    descriptor: &TraversalDescriptor,
    args: &StartArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start = resolve_start(graph, args)?;
    let label = node_label(&start);
    let start_id = start.id;
    let limit = args.limit.unwrap_or(usize::MAX);

    tracing::info!(
        "Running traversal '{}' from {} ({})",
        descriptor.name(),
        start_id,
        label
    );

    let mut traversal = descriptor.traverse(graph, start)?;
    let mut records = Vec::new();
    while records.len() < limit {
        let found = traversal
            .try_next()
            .with_context(|| format!("Traversal '{}' failed", descriptor.name()))?;
        match found {
            Some(found) => records.push(TraversalRecord::from(&found)),
            None => break,
        }
    }

    let report = RunReport {
        traversal: descriptor.name().to_string(),
        start: start_id,
        nodes: records,
        stats: traversal.stats().clone(),
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Table => {
            println!(
                "Traversal '{}' from {} ({}):",
                report.traversal, report.start, label
            );
            if report.nodes.is_empty() {
                println!("  (no nodes returned)");
            } else {
                print!("{}", records_table(&report.nodes));
            }
            println!(
                "  Visited {} nodes, traversed {} edges, returned {}",
                report.stats.nodes_visited, report.stats.edges_traversed, report.nodes.len()
            );
        }
    }

    Ok(())
}
