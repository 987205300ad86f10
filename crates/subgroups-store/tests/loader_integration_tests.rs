// Integration tests for the YAML loaders, including a full rewrite round
// driven only by fixture files

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use subgroups_core::command_hook::HostDependencies;
use subgroups_core::commands::{CommandKind, PublishedEvents};
use subgroups_core::errors::ExErrorKind;
use subgroups_core::graph::{apply, apply_batch};
use subgroups_core::{NodeTypeRegistry, Registrations};
use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn lang(code: &str) -> DimensionSpacePoint {
    DimensionSpacePoint::from_pairs([("language", code)])
}

#[test]
fn test_parse_node_types_fixture() {
    let path = fixtures_dir().join("node_types.yaml");

    let result = subgroups_store::parse_node_types_file(&path);
    assert!(result.is_ok(), "Should parse node types: {:?}", result.err());

    let registry = result.unwrap();
    assert_eq!(registry.len(), 5);

    let group = registry.get_node_type(&"Vendor:TextGroup".into()).unwrap();
    assert_eq!(group.group_tag(), Some("text"));
    assert!(group.is_type_selector());

    let text = registry.get_node_type(&"Vendor:Text".into()).unwrap();
    assert!(text.migration_table_from(&"Vendor:Headline".into()).is_some());
    assert!(text.migration_table_from(&"Vendor:Page".into()).is_none());
}

#[test]
fn test_reject_unknown_node_type_field() {
    let path = fixtures_dir().join("node_types_unknown_field.yaml");

    let err = subgroups_store::parse_node_types_file(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
    assert!(
        err.message().contains("propertyMigrationFrom"),
        "Error should name the unknown field: {}",
        err
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let path = fixtures_dir().join("does_not_exist.yaml");

    let err = subgroups_store::parse_node_types_file(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(err.op(), Some("node_types_read"));
}

#[test]
fn test_load_content_fixture() {
    let path = fixtures_dir().join("content.yaml");

    let repository = subgroups_store::load_content_file(&path).unwrap();
    let graph = repository.graph(&"live".into()).unwrap();

    assert_eq!(graph.node_aggregate_ids().count(), 3);
    let en = graph.variant(&"n1".into(), &lang("en")).unwrap();
    assert_eq!(en.properties["caption"], json!("Hello"));
    assert_eq!(
        en.references["related"],
        vec![NodeAggregateId::from("page-a"), NodeAggregateId::from("page-b")]
    );
}

#[test]
fn test_reject_content_schema_version() {
    let path = fixtures_dir().join("content_invalid_schema_version.yaml");

    let err = subgroups_store::load_content_file(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnsupportedSchemaVersion);
    assert!(err.to_string().contains("schema_version"));
}

#[test]
fn test_fixture_rewrite_round() {
    let registry = subgroups_store::parse_node_types_file(&fixtures_dir().join("node_types.yaml"))
        .unwrap();
    let content =
        subgroups_store::load_content_file(&fixtures_dir().join("content.yaml")).unwrap();
    let command =
        subgroups_store::parse_command_file(&fixtures_dir().join("change_type_command.yaml"))
            .unwrap();

    // the host has already handled the triggering command
    let content = apply(content, &command).unwrap();

    let deps = HostDependencies::new(Arc::new(registry), Arc::new(content.clone()));
    let hooks = Registrations::with_defaults().build_command_hooks(&deps);
    let batch = hooks
        .on_after_command_handled(&command, &PublishedEvents::empty())
        .unwrap();

    assert_eq!(
        batch.kinds(),
        vec![
            CommandKind::ClearReferences,
            CommandKind::ClearReferences,
            CommandKind::ChangeType,
            CommandKind::SetProperties,
            CommandKind::SetProperties,
            CommandKind::SetReferences,
            CommandKind::SetReferences,
        ]
    );

    let state = apply_batch(content, &batch).unwrap();
    let graph = state.graph(&"live".into()).unwrap();
    assert_eq!(
        graph.node_type_name(&"n1".into()),
        Some(&"Vendor:Headline".into())
    );

    let de = graph.variant(&"n1".into(), &lang("de")).unwrap();
    assert_eq!(de.properties["headline"], json!("Hallo"));
    assert_eq!(de.properties["caption"], json!("Hallo"));
    assert_eq!(de.references["links"], vec![NodeAggregateId::from("page-a")]);
    assert!(!de.references.contains_key("related"));

    let en = graph.variant(&"n1".into(), &lang("en")).unwrap();
    assert_eq!(en.properties["headline"], json!("Hello"));
    assert_eq!(en.references["links"].len(), 2);
}
