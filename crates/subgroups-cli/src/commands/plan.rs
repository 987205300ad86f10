//! Plan command
//!
//! Usage: subgroups plan --node-types <FILE> --content <FILE> --command <FILE> [--apply]
//!
//! The command is treated as already handled by the host: it is applied to
//! the content first, then the registered command hooks rewrite it.

use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use subgroups_core::commands::PublishedEvents;
use subgroups_core::graph::{apply, apply_batch, InMemoryContentGraph};
use subgroups_core::{HostDependencies, Registrations};
use subgroups_core_types::NodeAggregateId;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Node types YAML file
    #[arg(long)]
    pub node_types: PathBuf,

    /// Content fixture YAML file
    #[arg(long)]
    pub content: PathBuf,

    /// Command YAML/JSON file
    #[arg(long)]
    pub command: PathBuf,

    /// Apply the batch and print the resulting node instead
    #[arg(long)]
    pub apply: bool,
}

/// Execute plan command
pub fn execute(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = subgroups_store::parse_node_types_file(&args.node_types)?;
    let content = subgroups_store::load_content_file(&args.content)?;
    let command = subgroups_store::parse_command_file(&args.command)?;

    let content = apply(content, &command)?;

    let deps = HostDependencies::new(Arc::new(registry), Arc::new(content.clone()));
    let hooks = Registrations::with_defaults().build_command_hooks(&deps);
    let batch = hooks.on_after_command_handled(&command, &PublishedEvents::empty())?;

    if !args.apply {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    let state = apply_batch(content, &batch)?;
    let graph = state
        .graph(command.workspace())
        .ok_or_else(|| format!("workspace '{}' vanished", command.workspace()))?;
    let node = node_json(graph, command.node_aggregate_id());
    println!("{}", serde_json::to_string_pretty(&node)?);
    Ok(())
}

fn node_json(graph: &InMemoryContentGraph, id: &NodeAggregateId) -> serde_json::Value {
    let variants: Vec<_> = graph
        .variants(id)
        .map(|(point, variant)| {
            json!({
                "dimensions": point,
                "properties": variant.properties,
                "references": variant.references,
                "removed": variant.removed,
            })
        })
        .collect();

    json!({
        "id": id,
        "type": graph.node_type_name(id),
        "parent": graph.parent(id),
        "variants": variants,
    })
}
