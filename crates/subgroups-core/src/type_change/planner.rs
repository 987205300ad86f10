//! Migration planning: which property and reference writes a type change needs
//!
//! Reads the content graph only. Property values are copied to the new name
//! and left in place under the old name; references are copied to the new
//! name and the old name is cleared. Host writes are additive, so without the
//! clear a dangling old-named reference would remain visible.

use subgroups_core_types::{NodeAggregateId, NodeTypeName, WorkspaceName};

use crate::commands::Command;
use crate::errors::{Result, SubgroupsError};
use crate::graph::{ContentGraph, ContentSubgraph, VisibilityConstraints};
use crate::model::{NodeSnapshot, NodeTypeDescriptor};

/// Writes needed to carry a node's fields over to its new type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationPlan {
    /// `SetNodeProperties` / `SetNodeReferences` in table order, variant order within an entry
    pub additive_writes: Vec<Command>,
    /// Clears of old reference names, one per (entry, variant) that had references
    pub reference_clears: Vec<Command>,
    /// Number of variants that resolved to a live node
    pub resolved_variants: usize,
}

impl MigrationPlan {
    /// No migration table applies; only the type changes
    pub fn type_change_only() -> Self {
        Self::default()
    }

    pub fn is_type_change_only(&self) -> bool {
        self.additive_writes.is_empty() && self.reference_clears.is_empty()
    }
}

/// Plans field migrations against one workspace's content graph
pub struct MigrationPlanner<'a> {
    graph: &'a dyn ContentGraph,
}

struct ResolvedVariant<'a> {
    node: NodeSnapshot,
    subgraph: Box<dyn ContentSubgraph + 'a>,
}

impl<'a> MigrationPlanner<'a> {
    pub fn new(graph: &'a dyn ContentGraph) -> Self {
        Self { graph }
    }

    /// Plan the writes for switching `node_aggregate_id` from `old_node_type_name` to `new_type`
    ///
    /// # Errors
    ///
    /// Returns `NodeAggregateNotFound` if the aggregate does not exist in the
    /// graph while a migration table applies.
    pub fn plan(
        &self,
        workspace: &WorkspaceName,
        node_aggregate_id: &NodeAggregateId,
        old_node_type_name: &NodeTypeName,
        new_type: &NodeTypeDescriptor,
    ) -> Result<MigrationPlan> {
        if !new_type.is_type_selector() {
            return Ok(MigrationPlan::type_change_only());
        }
        let Some(table) = new_type.migration_table_from(old_node_type_name) else {
            return Ok(MigrationPlan::type_change_only());
        };

        let variants = self.resolve_variants(workspace, node_aggregate_id)?;
        let mut plan = MigrationPlan {
            resolved_variants: variants.len(),
            ..MigrationPlan::default()
        };

        for entry in table.iter() {
            let mut had_references = Vec::new();

            for variant in &variants {
                let node = &variant.node;
                if let Some(value) = node.property(&entry.from) {
                    plan.additive_writes.push(Command::set_property(
                        workspace.clone(),
                        node.aggregate_id.clone(),
                        node.origin_dimension_space_point.clone(),
                        entry.to.clone(),
                        value.clone(),
                    ));
                }

                let targets = variant
                    .subgraph
                    .find_references(&node.aggregate_id, &entry.from);
                if !targets.is_empty() {
                    plan.additive_writes.push(Command::set_references(
                        workspace.clone(),
                        node.aggregate_id.clone(),
                        node.origin_dimension_space_point.clone(),
                        entry.to.clone(),
                        targets,
                    ));
                }
                // the stored slot is cleared even when no target is visible
                if variant.subgraph.has_references(&node.aggregate_id, &entry.from) {
                    had_references.push(node);
                }
            }

            // clears go to their own list; the sequencer places them first
            for node in had_references {
                plan.reference_clears.push(Command::clear_references(
                    workspace.clone(),
                    node.aggregate_id.clone(),
                    node.origin_dimension_space_point.clone(),
                    entry.from.clone(),
                ));
            }
        }

        Ok(plan)
    }

    /// Live variants of the aggregate, in covered-point order
    fn resolve_variants(
        &self,
        workspace: &WorkspaceName,
        node_aggregate_id: &NodeAggregateId,
    ) -> Result<Vec<ResolvedVariant<'a>>> {
        let aggregate = self
            .graph
            .find_node_aggregate_by_id(node_aggregate_id)
            .ok_or_else(|| SubgroupsError::NodeAggregateNotFound {
                workspace: workspace.to_string(),
                node_aggregate_id: node_aggregate_id.to_string(),
            })?;

        let mut variants = Vec::with_capacity(aggregate.covered_dimension_space_points.len());
        for dimension_space_point in &aggregate.covered_dimension_space_points {
            let subgraph = self
                .graph
                .subgraph(dimension_space_point, VisibilityConstraints::exclude_removed());
            match subgraph.find_node_by_id(node_aggregate_id) {
                Some(node) => variants.push(ResolvedVariant { node, subgraph }),
                None => tracing::debug!(
                    node_aggregate_id = %node_aggregate_id,
                    dimension_space_point = %dimension_space_point,
                    "variant not resolvable, skipping"
                ),
            }
        }
        Ok(variants)
    }
}
