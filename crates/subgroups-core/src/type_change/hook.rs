//! `NodeTypeChangedCommandHook`: turns a `targetNodeTypeName` write into a type change
//!
//! Flow per handled command:
//!
//! 1. `trigger::detect` matches the write (anything else yields an empty batch)
//! 2. the target type is looked up in the node type registry; a type
//!    without the selector property stops here with a bare type change
//! 3. `MigrationPlanner` reads the node's variants from the content graph
//! 4. `sequencer::sequence` orders the result
//!
//! The hook holds no state between invocations.

use std::sync::Arc;

use subgroups_core_types::{NodeTypeName, RequestId};

use crate::command_hook::{CommandHook, CommandHookFactory, HostDependencies};
use crate::commands::{ChildConstraintConflictStrategy, Command, CommandBatch, PublishedEvents};
use crate::errors::{Result, SubgroupsError};
use crate::graph::{ContentGraph, ContentGraphReadModel};
use crate::node_types::NodeTypeRegistry;
use crate::type_change::planner::{MigrationPlan, MigrationPlanner};
use crate::type_change::sequencer::sequence;
use crate::type_change::trigger::{detect, TypeChangeIntent};
use crate::{log_op_end, log_op_error, log_op_start};

const OP: &str = "node_type_changed_hook";

pub struct NodeTypeChangedCommandHook {
    node_types: Arc<dyn NodeTypeRegistry>,
    content_graphs: Arc<dyn ContentGraphReadModel>,
}

impl NodeTypeChangedCommandHook {
    pub fn new(
        node_types: Arc<dyn NodeTypeRegistry>,
        content_graphs: Arc<dyn ContentGraphReadModel>,
    ) -> Self {
        Self {
            node_types,
            content_graphs,
        }
    }

    fn rewrite(&self, intent: &TypeChangeIntent<'_>) -> Result<CommandBatch> {
        let new_type_name = intent.target_node_type_name()?;
        let new_type = self.node_types.get_node_type(&new_type_name)?;
        let change_type = Command::change_node_aggregate_type(
            intent.workspace.clone(),
            intent.node_aggregate_id.clone(),
            new_type_name.clone(),
            ChildConstraintConflictStrategy::Delete,
        );

        // no selector property means no migration tables to consult
        if !new_type.is_type_selector() {
            return Ok(sequence(change_type, MigrationPlan::type_change_only()));
        }

        let graph = self.content_graphs.content_graph(intent.workspace)?;
        let old_type_name = self.current_node_type_name(graph, intent)?;

        let plan = MigrationPlanner::new(graph).plan(
            intent.workspace,
            intent.node_aggregate_id,
            &old_type_name,
            new_type,
        )?;
        tracing::debug!(
            node_aggregate_id = %intent.node_aggregate_id,
            from = %old_type_name,
            to = %new_type_name,
            resolved_variants = plan.resolved_variants,
            additive_writes = plan.additive_writes.len(),
            reference_clears = plan.reference_clears.len(),
            "migration planned"
        );
        Ok(sequence(change_type, plan))
    }

    fn current_node_type_name(
        &self,
        graph: &dyn ContentGraph,
        intent: &TypeChangeIntent<'_>,
    ) -> Result<NodeTypeName> {
        graph
            .find_node_aggregate_by_id(intent.node_aggregate_id)
            .map(|aggregate| aggregate.node_type_name)
            .ok_or_else(|| SubgroupsError::NodeAggregateNotFound {
                workspace: intent.workspace.to_string(),
                node_aggregate_id: intent.node_aggregate_id.to_string(),
            })
    }
}

impl CommandHook for NodeTypeChangedCommandHook {
    fn on_after_command_handled(
        &self,
        command: &Command,
        _events: &PublishedEvents,
    ) -> Result<CommandBatch> {
        let Some(intent) = detect(command) else {
            return Ok(CommandBatch::empty());
        };

        let request_id = RequestId::new();
        log_op_start!(
            OP,
            request_id = %request_id,
            workspace = %intent.workspace,
            node_aggregate_id = %intent.node_aggregate_id
        );
        let start = std::time::Instant::now();

        let batch = self.rewrite(&intent).map_err(|e| {
            log_op_error!(
                OP,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id
            );
            e
        })?;

        log_op_end!(
            OP,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            batch_len = batch.len()
        );
        Ok(batch)
    }
}

/// Builds `NodeTypeChangedCommandHook` from the host's registry and graph
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTypeChangedCommandHookFactory;

impl CommandHookFactory for NodeTypeChangedCommandHookFactory {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn CommandHook> {
        Box::new(NodeTypeChangedCommandHook::new(
            Arc::clone(&dependencies.node_types),
            Arc::clone(&dependencies.content_graphs),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandKind;
    use crate::graph::InMemoryContentRepository;
    use crate::model::{NodeTypeDescriptor, PropertyValues, TARGET_NODE_TYPE_NAME};
    use crate::node_types::InMemoryNodeTypeRegistry;
    use serde_json::json;
    use subgroups_core_types::DimensionSpacePoint;

    fn hook() -> NodeTypeChangedCommandHook {
        let registry = InMemoryNodeTypeRegistry::from_descriptors([
            NodeTypeDescriptor::new("Vendor:Text").with_property("caption"),
            NodeTypeDescriptor::new("Vendor:Headline")
                .with_type_selector()
                .with_property("headline")
                .with_migration_from("Vendor:Text", [("caption", "headline")]),
        ])
        .unwrap();

        let mut properties = PropertyValues::new();
        properties.insert("caption".to_string(), json!("Hello"));
        let mut content = InMemoryContentRepository::new();
        content.graph_mut(&"live".into()).insert_node(
            "n1",
            "Vendor:Text",
            DimensionSpacePoint::empty(),
            properties,
        );

        NodeTypeChangedCommandHook::new(Arc::new(registry), Arc::new(content))
    }

    fn target(value: serde_json::Value) -> Command {
        Command::set_property(
            "live".into(),
            "n1".into(),
            DimensionSpacePoint::empty(),
            TARGET_NODE_TYPE_NAME,
            value,
        )
    }

    #[test]
    fn test_non_matching_command_yields_empty_batch() {
        let cmd = Command::set_property(
            "live".into(),
            "n1".into(),
            DimensionSpacePoint::empty(),
            "caption",
            json!("Bye"),
        );
        let batch = hook()
            .on_after_command_handled(&cmd, &PublishedEvents::empty())
            .unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_matching_command_is_rewritten() {
        let batch = hook()
            .on_after_command_handled(&target(json!("Vendor:Headline")), &PublishedEvents::empty())
            .unwrap();
        assert_eq!(
            batch.kinds(),
            vec![CommandKind::ChangeType, CommandKind::SetProperties]
        );
    }

    #[test]
    fn test_unknown_and_empty_target_fail() {
        for value in [json!("Vendor:Missing"), json!("")] {
            let result =
                hook().on_after_command_handled(&target(value), &PublishedEvents::empty());
            assert!(matches!(
                result,
                Err(SubgroupsError::NodeTypeNotFound { .. })
            ));
        }
    }

    #[test]
    fn test_target_without_selector_skips_graph() {
        let registry = InMemoryNodeTypeRegistry::from_descriptors([
            NodeTypeDescriptor::new("Vendor:Plain").with_property("body"),
        ])
        .unwrap();
        let hook = NodeTypeChangedCommandHook::new(
            Arc::new(registry),
            Arc::new(InMemoryContentRepository::new()),
        );

        // neither the workspace nor the aggregate exist
        let batch = hook
            .on_after_command_handled(&target(json!("Vendor:Plain")), &PublishedEvents::empty())
            .unwrap();
        assert_eq!(
            batch.into_vec(),
            vec![Command::change_node_aggregate_type(
                "live".into(),
                "n1".into(),
                "Vendor:Plain".into(),
                ChildConstraintConflictStrategy::Delete,
            )]
        );
    }

    #[test]
    fn test_non_string_target_fails() {
        let result =
            hook().on_after_command_handled(&target(json!(42)), &PublishedEvents::empty());
        assert!(matches!(
            result,
            Err(SubgroupsError::InvalidTargetNodeTypeName { .. })
        ));
    }
}
