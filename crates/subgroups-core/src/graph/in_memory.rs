use std::collections::BTreeMap;
use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, NodeTypeName, WorkspaceName};

use crate::errors::{Result, SubgroupsError};
use crate::graph::{ContentGraph, ContentGraphReadModel, ContentSubgraph, VisibilityConstraints};
use crate::model::{NodeAggregate, NodeSnapshot, PropertyValues};

/// State of one node variant at one dimension space point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeVariant {
    pub properties: PropertyValues,
    pub references: BTreeMap<String, Vec<NodeAggregateId>>,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AggregateRecord {
    pub(crate) node_type_name: NodeTypeName,
    pub(crate) parent: Option<NodeAggregateId>,
    pub(crate) variants: BTreeMap<DimensionSpacePoint, NodeVariant>,
}

/// In-memory content graph for a single workspace
///
/// Each variant covers exactly its origin point; there is no fallback or
/// specialization between dimension space points.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryContentGraph {
    workspace: WorkspaceName,
    pub(crate) aggregates: BTreeMap<NodeAggregateId, AggregateRecord>,
}

impl InMemoryContentGraph {
    pub fn new(workspace: impl Into<WorkspaceName>) -> Self {
        Self {
            workspace: workspace.into(),
            aggregates: BTreeMap::new(),
        }
    }

    /// Add a variant, creating the aggregate on first use
    ///
    /// The node type of an existing aggregate is kept.
    pub fn insert_node(
        &mut self,
        id: impl Into<NodeAggregateId>,
        node_type_name: impl Into<NodeTypeName>,
        dimension_space_point: DimensionSpacePoint,
        properties: PropertyValues,
    ) -> &mut Self {
        let record = self
            .aggregates
            .entry(id.into())
            .or_insert_with(|| AggregateRecord {
                node_type_name: node_type_name.into(),
                parent: None,
                variants: BTreeMap::new(),
            });
        record.variants.insert(
            dimension_space_point,
            NodeVariant {
                properties,
                ..NodeVariant::default()
            },
        );
        self
    }

    /// # Errors
    ///
    /// Returns `NodeAggregateNotFound` / `NodeVariantNotFound` for unknown targets.
    pub fn set_property(
        &mut self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<()> {
        self.variant_mut(id, dimension_space_point)?
            .properties
            .insert(name.into(), value);
        Ok(())
    }

    /// Replace the targets of one reference name; an empty list removes it
    ///
    /// # Errors
    ///
    /// Returns `NodeAggregateNotFound` / `NodeVariantNotFound` for unknown targets.
    pub fn set_references(
        &mut self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
        reference_name: impl Into<String>,
        targets: Vec<NodeAggregateId>,
    ) -> Result<()> {
        let variant = self.variant_mut(id, dimension_space_point)?;
        let reference_name = reference_name.into();
        if targets.is_empty() {
            variant.references.remove(&reference_name);
        } else {
            variant.references.insert(reference_name, targets);
        }
        Ok(())
    }

    /// Soft-delete one variant
    ///
    /// # Errors
    ///
    /// Returns `NodeAggregateNotFound` / `NodeVariantNotFound` for unknown targets.
    pub fn mark_removed(
        &mut self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
    ) -> Result<()> {
        self.variant_mut(id, dimension_space_point)?.removed = true;
        Ok(())
    }

    pub fn node_type_name(&self, id: &NodeAggregateId) -> Option<&NodeTypeName> {
        self.aggregates.get(id).map(|a| &a.node_type_name)
    }

    pub fn variant(
        &self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
    ) -> Option<&NodeVariant> {
        self.aggregates
            .get(id)
            .and_then(|a| a.variants.get(dimension_space_point))
    }

    pub fn parent(&self, id: &NodeAggregateId) -> Option<&NodeAggregateId> {
        self.aggregates.get(id).and_then(|a| a.parent.as_ref())
    }

    pub fn node_aggregate_ids(&self) -> impl Iterator<Item = &NodeAggregateId> {
        self.aggregates.keys()
    }

    /// Variants of one aggregate in dimension space point order
    pub fn variants(
        &self,
        id: &NodeAggregateId,
    ) -> impl Iterator<Item = (&DimensionSpacePoint, &NodeVariant)> {
        self.aggregates
            .get(id)
            .into_iter()
            .flat_map(|a| a.variants.iter())
    }

    pub(crate) fn aggregate_mut(&mut self, id: &NodeAggregateId) -> Result<&mut AggregateRecord> {
        let workspace = self.workspace.to_string();
        self.aggregates
            .get_mut(id)
            .ok_or_else(|| SubgroupsError::NodeAggregateNotFound {
                workspace,
                node_aggregate_id: id.to_string(),
            })
    }

    pub(crate) fn variant_mut(
        &mut self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
    ) -> Result<&mut NodeVariant> {
        self.aggregate_mut(id)?
            .variants
            .get_mut(dimension_space_point)
            .ok_or_else(|| SubgroupsError::NodeVariantNotFound {
                node_aggregate_id: id.to_string(),
                dimension_space_point: dimension_space_point.to_string(),
            })
    }

    fn visible_variant(
        &self,
        id: &NodeAggregateId,
        dimension_space_point: &DimensionSpacePoint,
        visibility: VisibilityConstraints,
    ) -> Option<(&AggregateRecord, &NodeVariant)> {
        let aggregate = self.aggregates.get(id)?;
        let variant = aggregate.variants.get(dimension_space_point)?;
        if visibility.exclude_removed && variant.removed {
            return None;
        }
        Some((aggregate, variant))
    }
}

impl ContentGraph for InMemoryContentGraph {
    fn workspace_name(&self) -> &WorkspaceName {
        &self.workspace
    }

    fn find_node_aggregate_by_id(&self, id: &NodeAggregateId) -> Option<NodeAggregate> {
        self.aggregates.get(id).map(|record| NodeAggregate {
            id: id.clone(),
            node_type_name: record.node_type_name.clone(),
            covered_dimension_space_points: record.variants.keys().cloned().collect(),
        })
    }

    fn subgraph(
        &self,
        dimension_space_point: &DimensionSpacePoint,
        visibility: VisibilityConstraints,
    ) -> Box<dyn ContentSubgraph + '_> {
        Box::new(InMemorySubgraph {
            graph: self,
            dimension_space_point: dimension_space_point.clone(),
            visibility,
        })
    }
}

struct InMemorySubgraph<'a> {
    graph: &'a InMemoryContentGraph,
    dimension_space_point: DimensionSpacePoint,
    visibility: VisibilityConstraints,
}

impl ContentSubgraph for InMemorySubgraph<'_> {
    fn dimension_space_point(&self) -> &DimensionSpacePoint {
        &self.dimension_space_point
    }

    fn find_node_by_id(&self, id: &NodeAggregateId) -> Option<NodeSnapshot> {
        let (aggregate, variant) =
            self.graph
                .visible_variant(id, &self.dimension_space_point, self.visibility)?;
        Some(NodeSnapshot {
            aggregate_id: id.clone(),
            node_type_name: aggregate.node_type_name.clone(),
            origin_dimension_space_point: self.dimension_space_point.clone(),
            properties: variant.properties.clone(),
        })
    }

    fn find_references(
        &self,
        source: &NodeAggregateId,
        reference_name: &str,
    ) -> Vec<NodeAggregateId> {
        let Some((_, variant)) =
            self.graph
                .visible_variant(source, &self.dimension_space_point, self.visibility)
        else {
            return Vec::new();
        };

        variant
            .references
            .get(reference_name)
            .map(|targets| {
                targets
                    .iter()
                    .filter(|target| {
                        self.graph
                            .visible_variant(target, &self.dimension_space_point, self.visibility)
                            .is_some()
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_references(&self, source: &NodeAggregateId, reference_name: &str) -> bool {
        self.graph
            .visible_variant(source, &self.dimension_space_point, self.visibility)
            .and_then(|(_, variant)| variant.references.get(reference_name))
            .is_some_and(|targets| !targets.is_empty())
    }
}

/// All workspaces of an in-memory content repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryContentRepository {
    graphs: BTreeMap<WorkspaceName, InMemoryContentGraph>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph of `workspace`, created empty on first access
    pub fn graph_mut(&mut self, workspace: &WorkspaceName) -> &mut InMemoryContentGraph {
        self.graphs
            .entry(workspace.clone())
            .or_insert_with(|| InMemoryContentGraph::new(workspace.clone()))
    }

    pub fn graph(&self, workspace: &WorkspaceName) -> Option<&InMemoryContentGraph> {
        self.graphs.get(workspace)
    }

    pub fn graphs(&self) -> impl Iterator<Item = &InMemoryContentGraph> {
        self.graphs.values()
    }

    pub(crate) fn existing_graph_mut(
        &mut self,
        workspace: &WorkspaceName,
    ) -> Result<&mut InMemoryContentGraph> {
        self.graphs
            .get_mut(workspace)
            .ok_or_else(|| SubgroupsError::WorkspaceNotFound {
                workspace: workspace.to_string(),
            })
    }
}

impl ContentGraphReadModel for InMemoryContentRepository {
    fn content_graph(&self, workspace: &WorkspaceName) -> Result<&dyn ContentGraph> {
        self.graphs
            .get(workspace)
            .map(|graph| graph as &dyn ContentGraph)
            .ok_or_else(|| SubgroupsError::WorkspaceNotFound {
                workspace: workspace.to_string(),
            })
    }
}
