//! Trigger detection: is this command a "change node type" intent?

use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, NodeTypeName, WorkspaceName};

use crate::commands::Command;
use crate::errors::{Result, SubgroupsError};
use crate::model::TARGET_NODE_TYPE_NAME;

/// A matched change-type intent, borrowed from the incoming command
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChangeIntent<'a> {
    pub workspace: &'a WorkspaceName,
    pub node_aggregate_id: &'a NodeAggregateId,
    pub origin_dimension_space_point: &'a DimensionSpacePoint,
    target: &'a serde_json::Value,
}

impl TypeChangeIntent<'_> {
    /// Requested node type name
    ///
    /// Empty and unknown names pass through; the registry lookup rejects them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTargetNodeTypeName` if the written value is not a string.
    pub fn target_node_type_name(&self) -> Result<NodeTypeName> {
        self.target
            .as_str()
            .map(NodeTypeName::from)
            .ok_or_else(|| SubgroupsError::InvalidTargetNodeTypeName {
                reason: format!("expected a string, got {}", self.target),
            })
    }
}

/// Match a `SetNodeProperties` command that writes `targetNodeTypeName`
///
/// Pure predicate plus extraction; every other command yields `None`.
pub fn detect(command: &Command) -> Option<TypeChangeIntent<'_>> {
    let Command::SetNodeProperties(cmd) = command else {
        return None;
    };
    if cmd.property_values.is_empty() {
        return None;
    }
    let target = cmd.property_values.get(TARGET_NODE_TYPE_NAME)?;

    Some(TypeChangeIntent {
        workspace: &cmd.workspace,
        node_aggregate_id: &cmd.node_aggregate_id,
        origin_dimension_space_point: &cmd.origin_dimension_space_point,
        target,
    })
}
