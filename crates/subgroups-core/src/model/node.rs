use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, NodeTypeName};

/// Property name → value, as written by `SetNodeProperties`
pub type PropertyValues = BTreeMap<String, serde_json::Value>;

/// A node aggregate as seen by the content graph
///
/// `covered_dimension_space_points` lists every point in which the aggregate
/// currently has a variant, including variants that are marked removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAggregate {
    pub id: NodeAggregateId,
    pub node_type_name: NodeTypeName,
    pub covered_dimension_space_points: Vec<DimensionSpacePoint>,
}

/// One materialized variant of a node aggregate, read fresh per invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub aggregate_id: NodeAggregateId,
    pub node_type_name: NodeTypeName,
    pub origin_dimension_space_point: DimensionSpacePoint,
    pub properties: PropertyValues,
}

impl NodeSnapshot {
    /// A property counts as present when it is set to a non-null value
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name).filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_property_is_absent() {
        let mut properties = PropertyValues::new();
        properties.insert("caption".to_string(), json!("Hello"));
        properties.insert("subtitle".to_string(), serde_json::Value::Null);

        let node = NodeSnapshot {
            aggregate_id: "n1".into(),
            node_type_name: "Vendor:Text".into(),
            origin_dimension_space_point: DimensionSpacePoint::empty(),
            properties,
        };

        assert!(node.has_property("caption"));
        assert!(!node.has_property("subtitle"));
        assert!(!node.has_property("missing"));
        assert_eq!(node.property("caption"), Some(&json!("Hello")));
    }
}
