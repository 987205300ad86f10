//! Node Types Format v0 schema
//!
//! Defines the YAML structure for node type configuration:
//!
//! ```yaml
//! schema_version: 0
//! node_types:
//!   Vendor:Headline:
//!     label: Headline
//!     properties:
//!       targetNodeTypeName: { type: string }
//!       headline: { type: string }
//!     references: [links]
//!     ui: { icon: icon-header, position: 10 }
//!     content_subgroup:
//!       tags: [text]
//!       property_migration_from:
//!         Vendor:Text:
//!           caption: headline
//!           related: links
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use subgroups_core::model::{
    ContentSubgroupOptions, NodeTypeDescriptor, NodeTypeUi, PropertyDeclaration,
};

/// Top-level node types file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeTypesV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Node types by name, in name order
    #[serde(default)]
    pub node_types: BTreeMap<String, NodeTypeEntryV0>,
}

/// One node type declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeTypeEntryV0 {
    /// Display label; defaults to the type name
    #[serde(default)]
    pub label: Option<String>,

    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDeclaration>,

    #[serde(default)]
    pub references: Vec<String>,

    #[serde(default)]
    pub ui: NodeTypeUi,

    #[serde(default)]
    pub content_subgroup: ContentSubgroupOptions,
}

impl NodeTypeEntryV0 {
    /// Build the (not yet validated) descriptor for `name`
    pub fn into_descriptor(self, name: &str) -> NodeTypeDescriptor {
        let mut descriptor = NodeTypeDescriptor::new(name)
            .with_abstract(self.is_abstract)
            .with_ui(self.ui);
        if let Some(label) = self.label {
            descriptor = descriptor.with_label(label);
        }
        descriptor.properties = self.properties;
        descriptor.references = self.references.into_iter().collect();
        descriptor.content_subgroup = self.content_subgroup;
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subgroups_core::TARGET_NODE_TYPE_NAME;

    #[test]
    fn test_parse_minimal_node_types() {
        let yaml = r#"
schema_version: 0
node_types:
  Vendor:Text:
    properties:
      caption: {}
"#;

        let parsed: NodeTypesV0 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.schema_version, 0);
        assert_eq!(parsed.node_types.len(), 1);

        let descriptor = parsed.node_types["Vendor:Text"].clone().into_descriptor("Vendor:Text");
        assert_eq!(descriptor.label, "Vendor:Text");
        assert_eq!(descriptor.properties["caption"].property_type, "string");
    }

    #[test]
    fn test_group_tag_on_selector_property() {
        let yaml = r#"
schema_version: 0
node_types:
  Vendor:TextGroup:
    label: Text
    properties:
      targetNodeTypeName:
        type: string
        group_tag: text
"#;

        let parsed: NodeTypesV0 = serde_yaml::from_str(yaml).unwrap();
        let descriptor = parsed.node_types["Vendor:TextGroup"]
            .clone()
            .into_descriptor("Vendor:TextGroup");
        assert!(descriptor.declares_property(TARGET_NODE_TYPE_NAME));
        assert_eq!(descriptor.group_tag(), Some("text"));
        assert_eq!(descriptor.label, "Text");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let yaml = r#"
schema_version: 0
node_types:
  Vendor:Text:
    superTypes: [Vendor:Base]
"#;

        let result: Result<NodeTypesV0, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
