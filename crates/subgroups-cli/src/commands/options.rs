//! Options command
//!
//! Usage: subgroups options --node-types <FILE> --node-type <TYPE> [--content-subgroup <TAG>]

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use subgroups_core::data_source::DataSourceArguments;
use subgroups_core::model::{NodeSnapshot, PropertyValues};
use subgroups_core::registration::TARGET_NODE_TYPES_DATA_SOURCE;
use subgroups_core::{
    HostDependencies, InMemoryContentRepository, NodeTypeRegistry, Registrations,
};
use subgroups_core_types::{DimensionSpacePoint, NodeTypeName};

#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Node types YAML file
    #[arg(long)]
    pub node_types: PathBuf,

    /// Type of the node the picker is opened on
    #[arg(long)]
    pub node_type: String,

    /// Restrict options to this subgroup tag
    #[arg(long)]
    pub content_subgroup: Option<String>,
}

/// Execute options command
pub fn execute(args: OptionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = subgroups_store::parse_node_types_file(&args.node_types)?;
    let node_type_name = NodeTypeName::new(args.node_type);
    registry.get_node_type(&node_type_name)?;

    let deps = HostDependencies::new(
        Arc::new(registry),
        Arc::new(InMemoryContentRepository::new()),
    );
    let source =
        Registrations::with_defaults().build_data_source(TARGET_NODE_TYPES_DATA_SOURCE, &deps)?;

    // the picker is opened on a node that does not exist yet
    let context = NodeSnapshot {
        aggregate_id: "picker-context".into(),
        node_type_name,
        origin_dimension_space_point: DimensionSpacePoint::empty(),
        properties: PropertyValues::new(),
    };
    let arguments = DataSourceArguments {
        content_subgroup: args.content_subgroup,
    };

    let options = source.get_data(Some(&context), &arguments)?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}
