//! Node types parser with validation
//!
//! Parses YAML, checks the schema version and builds a validated registry.
//! Migration tables are normalized here, so rewrite time never sees a
//! malformed entry.

#![allow(clippy::result_large_err)]

use crate::errors::{
    from_domain, io_error, schema_validation, unsupported_schema_version, yaml_error, Result,
};
use crate::nodetypes::format_v0::NodeTypesV0;
use std::fs;
use std::path::Path;
use subgroups_core::{log_op_end, log_op_error, log_op_start};
use subgroups_core::{InMemoryNodeTypeRegistry, NodeTypeRegistry};

const OP: &str = "node_types_load";

/// Parse a node types file from a path
pub fn parse_node_types_file(path: &Path) -> Result<InMemoryNodeTypeRegistry> {
    let content = fs::read_to_string(path).map_err(|e| io_error("node_types_read", e))?;
    parse_node_types_str(&content)
}

/// Parse node types from a string
pub fn parse_node_types_str(content: &str) -> Result<InMemoryNodeTypeRegistry> {
    log_op_start!(OP);
    let start = std::time::Instant::now();

    let registry = load(content).map_err(|e| {
        log_op_error!(OP, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(
        OP,
        duration_ms = start.elapsed().as_millis() as u64,
        node_type_count = registry.len()
    );
    Ok(registry)
}

fn load(content: &str) -> Result<InMemoryNodeTypeRegistry> {
    let parsed: NodeTypesV0 =
        serde_yaml::from_str(content).map_err(|e| yaml_error("node_types_parse", e))?;

    if parsed.schema_version != 0 {
        return Err(unsupported_schema_version(
            "node_types_parse",
            parsed.schema_version,
        ));
    }

    let mut registry = InMemoryNodeTypeRegistry::new();
    for (name, entry) in parsed.node_types {
        if name.trim().is_empty() {
            return Err(schema_validation("Node type name must not be empty"));
        }
        registry
            .register(entry.into_descriptor(&name))
            .map_err(|e| from_domain(OP, e))?;
    }

    warn_on_unknown_sources(&registry);
    Ok(registry)
}

/// Source types may live outside this file; only note them
fn warn_on_unknown_sources(registry: &InMemoryNodeTypeRegistry) {
    for node_type in registry.node_types() {
        for source in node_type.content_subgroup.property_migration_from.keys() {
            if !registry.has_node_type(source) {
                tracing::debug!(
                    node_type = %node_type.name,
                    source = %source,
                    "migration table source type is not declared"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subgroups_core::errors::ExErrorKind;

    const VALID: &str = r#"
schema_version: 0
node_types:
  Vendor:Text:
    properties:
      targetNodeTypeName: {}
      caption: {}
    references: [related]
  Vendor:Headline:
    properties:
      targetNodeTypeName: {}
      headline: {}
    references: [links]
    content_subgroup:
      tags: [text]
      property_migration_from:
        Vendor:Text:
          caption: headline
          related: links
"#;

    #[test]
    fn test_parse_valid_node_types() {
        let registry = parse_node_types_str(VALID).unwrap();
        assert_eq!(registry.len(), 2);

        let headline = registry.get_node_type(&"Vendor:Headline".into()).unwrap();
        let table = headline.migration_table_from(&"Vendor:Text".into()).unwrap();
        let pairs: Vec<_> = table
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(pairs, vec![("caption", "headline"), ("related", "links")]);
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        let yaml = "schema_version: 99\nnode_types: {}\n";
        let err = parse_node_types_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnsupportedSchemaVersion);
        assert!(err.to_string().contains("schema_version"));
    }

    #[test]
    fn test_reject_undeclared_migration_target() {
        let yaml = r#"
schema_version: 0
node_types:
  Vendor:Headline:
    properties:
      targetNodeTypeName: {}
    content_subgroup:
      property_migration_from:
        Vendor:Text:
          caption: headline
"#;
        let err = parse_node_types_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidMigration);
        assert_eq!(err.entity_id(), Some("Vendor:Headline"));
        assert_eq!(err.op(), Some("node_types_load"));
    }

    #[test]
    fn test_reject_non_string_migration_value() {
        let yaml = r#"
schema_version: 0
node_types:
  Vendor:Headline:
    properties:
      headline: {}
    content_subgroup:
      property_migration_from:
        Vendor:Text:
          caption: [headline]
"#;
        let err = parse_node_types_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
