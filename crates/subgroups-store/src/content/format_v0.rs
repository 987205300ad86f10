//! Content Format v0 schema
//!
//! ```yaml
//! schema_version: 0
//! workspaces:
//!   live:
//!     nodes:
//!       - id: n1
//!         type: Vendor:Text
//!         variants:
//!           - dimensions: { language: en }
//!             properties: { caption: Hello }
//!             references: { related: [a] }
//!           - dimensions: { language: de }
//!             removed: true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level content file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    #[serde(default)]
    pub workspaces: BTreeMap<String, ContentWorkspaceV0>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentWorkspaceV0 {
    #[serde(default)]
    pub nodes: Vec<ContentNodeV0>,
}

/// One node aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentNodeV0 {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    pub variants: Vec<ContentVariantV0>,
}

/// One variant of a node aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentVariantV0 {
    /// Dimension values; empty for a dimensionless repository
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,

    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,

    /// Reference name → target node ids, in order
    #[serde(default)]
    pub references: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_content() {
        let yaml = r#"
schema_version: 0
workspaces:
  live:
    nodes:
      - id: n1
        type: Vendor:Text
        variants:
          - properties:
              caption: Hello
              count: 3
"#;

        let content: ContentV0 = serde_yaml::from_str(yaml).unwrap();
        let node = &content.workspaces["live"].nodes[0];
        assert_eq!(node.node_type, "Vendor:Text");
        assert!(node.variants[0].dimensions.is_empty());
        assert_eq!(node.variants[0].properties["caption"], serde_json::json!("Hello"));
        assert_eq!(node.variants[0].properties["count"], serde_json::json!(3));
        assert!(!node.variants[0].removed);
    }
}
