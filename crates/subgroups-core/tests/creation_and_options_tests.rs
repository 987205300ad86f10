#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use serde_json::json;
use subgroups_core::command_hook::HostDependencies;
use subgroups_core::commands::{ChildConstraintConflictStrategy, Command, CreateNodeAggregateWithNode};
use subgroups_core::creation::{NodeCreationCommands, NodeCreationElements};
use subgroups_core::data_source::DataSourceArguments;
use subgroups_core::model::{NodeSnapshot, NodeTypeDescriptor, NodeTypeUi, PropertyValues};
use subgroups_core::registration::TARGET_NODE_TYPES_DATA_SOURCE;
use subgroups_core::{
    apply_batch, InMemoryContentRepository, InMemoryNodeTypeRegistry, Registrations,
    TARGET_NODE_TYPE_NAME,
};
use subgroups_core_types::DimensionSpacePoint;

fn ui(icon: &str, position: i64) -> NodeTypeUi {
    NodeTypeUi {
        icon: Some(icon.to_string()),
        position: Some(position),
        help_message: Some("Pick a text element".to_string()),
    }
}

fn dependencies() -> HostDependencies {
    let registry = InMemoryNodeTypeRegistry::from_descriptors([
        NodeTypeDescriptor::new("Vendor:TextGroup")
            .with_label("Text elements")
            .with_group_tag("text"),
        NodeTypeDescriptor::new("Vendor:Headline")
            .with_label("Headline")
            .with_type_selector()
            .with_tags(["text"])
            .with_ui(ui("icon-header", 2)),
        NodeTypeDescriptor::new("Vendor:Paragraph")
            .with_label("Paragraph")
            .with_type_selector()
            .with_tags(["text"])
            .with_ui(ui("icon-paragraph", 1)),
    ])
    .unwrap();

    let mut content = InMemoryContentRepository::new();
    content.graph_mut(&"live".into()).insert_node(
        "parent",
        "Vendor:TextGroup",
        DimensionSpacePoint::empty(),
        PropertyValues::new(),
    );
    HostDependencies::new(Arc::new(registry), Arc::new(content))
}

fn create_group_node() -> NodeCreationCommands {
    NodeCreationCommands::new(CreateNodeAggregateWithNode {
        workspace: "live".into(),
        node_aggregate_id: "fresh".into(),
        node_type_name: "Vendor:TextGroup".into(),
        origin_dimension_space_point: DimensionSpacePoint::empty(),
        parent_node_aggregate_id: Some("parent".into()),
        initial_property_values: PropertyValues::new(),
    })
}

#[test]
fn test_created_group_node_ends_up_with_picked_type() {
    let deps = dependencies();
    let handlers = Registrations::with_defaults().build_node_creation_handlers(&deps);

    let mut elements = NodeCreationElements::new();
    elements.insert(TARGET_NODE_TYPE_NAME.to_string(), json!("Vendor:Paragraph"));

    let commands = handlers.handle(create_group_node(), &elements).unwrap();
    assert_eq!(
        commands.additional.as_slice(),
        &[Command::change_node_aggregate_type(
            "live".into(),
            "fresh".into(),
            "Vendor:Paragraph".into(),
            ChildConstraintConflictStrategy::PromisedCascade,
        )]
    );

    let state = apply_batch(InMemoryContentRepository::new(), &commands.into_batch()).unwrap();
    assert_eq!(
        state.graph(&"live".into()).unwrap().node_type_name(&"fresh".into()),
        Some(&"Vendor:Paragraph".into())
    );
}

#[test]
fn test_creation_without_pick_is_untouched() {
    let deps = dependencies();
    let handlers = Registrations::with_defaults().build_node_creation_handlers(&deps);

    let commands = handlers
        .handle(create_group_node(), &NodeCreationElements::new())
        .unwrap();
    assert!(commands.additional.is_empty());
}

#[test]
fn test_options_grouped_and_positioned() {
    let deps = dependencies();
    let source = Registrations::with_defaults()
        .build_data_source(TARGET_NODE_TYPES_DATA_SOURCE, &deps)
        .unwrap();

    let context = NodeSnapshot {
        aggregate_id: "parent".into(),
        node_type_name: "Vendor:TextGroup".into(),
        origin_dimension_space_point: DimensionSpacePoint::empty(),
        properties: PropertyValues::new(),
    };
    let options = source
        .get_data(Some(&context), &DataSourceArguments::for_subgroup("text"))
        .unwrap();

    assert_eq!(
        serde_json::to_value(&options).unwrap(),
        json!([
            {
                "label": "Paragraph",
                "value": "Vendor:Paragraph",
                "icon": "paragraph",
                "description": "Pick a text element",
                "group": "Text elements"
            },
            {
                "label": "Headline",
                "value": "Vendor:Headline",
                "icon": "header",
                "description": "Pick a text element",
                "group": "Text elements"
            }
        ])
    );
}

#[test]
fn test_options_for_unknown_subgroup_are_empty() {
    let deps = dependencies();
    let source = Registrations::with_defaults()
        .build_data_source(TARGET_NODE_TYPES_DATA_SOURCE, &deps)
        .unwrap();
    let context = NodeSnapshot {
        aggregate_id: "parent".into(),
        node_type_name: "Vendor:TextGroup".into(),
        origin_dimension_space_point: DimensionSpacePoint::empty(),
        properties: PropertyValues::new(),
    };

    let options = source
        .get_data(Some(&context), &DataSourceArguments::for_subgroup("media"))
        .unwrap();
    assert!(options.is_empty());
}
