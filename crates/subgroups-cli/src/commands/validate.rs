//! Validate command
//!
//! Usage: subgroups validate --node-types <FILE> [--content <FILE>]

use clap::Args;
use std::path::PathBuf;
use subgroups_core::graph::ContentGraph;
use subgroups_core::NodeTypeRegistry;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Node types YAML file
    #[arg(long)]
    pub node_types: PathBuf,

    /// Content fixture YAML file
    #[arg(long)]
    pub content: Option<PathBuf>,
}

/// Execute validate command
pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = subgroups_store::parse_node_types_file(&args.node_types)?;

    let tables: usize = registry
        .node_types()
        .iter()
        .map(|t| t.content_subgroup.property_migration_from.len())
        .sum();
    println!(
        "✓ {} node types, {} migration tables",
        registry.len(),
        tables
    );

    if let Some(path) = args.content {
        let repository = subgroups_store::load_content_file(&path)?;
        for graph in repository.graphs() {
            let ids: Vec<_> = graph.node_aggregate_ids().collect();

            // content may only use declared types
            for id in &ids {
                if let Some(name) = graph.node_type_name(id) {
                    registry.get_node_type(name)?;
                }
            }
            println!("✓ workspace {}: {} nodes", graph.workspace_name(), ids.len());
        }
    }

    Ok(())
}
