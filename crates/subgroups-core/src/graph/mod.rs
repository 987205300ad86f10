//! Read-only content graph seam
//!
//! The rewrite engine reads the host's content graph through these traits
//! and never writes to it. `in_memory` provides a reference implementation
//! and `apply` executes commands against it with the host's write semantics.

pub mod apply;
pub mod in_memory;

use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, WorkspaceName};

use crate::errors::Result;
use crate::model::{NodeAggregate, NodeSnapshot};

pub use apply::{apply, apply_batch};
pub use in_memory::{InMemoryContentGraph, InMemoryContentRepository, NodeVariant};

/// Which nodes a subgraph exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityConstraints {
    pub exclude_removed: bool,
}

impl VisibilityConstraints {
    /// Hide nodes tagged as removed (soft-deleted)
    pub fn exclude_removed() -> Self {
        Self {
            exclude_removed: true,
        }
    }

    pub fn unrestricted() -> Self {
        Self {
            exclude_removed: false,
        }
    }
}

/// Entry point: one content graph per workspace
pub trait ContentGraphReadModel: Send + Sync {
    /// # Errors
    ///
    /// Returns `WorkspaceNotFound` if the workspace has no content graph.
    fn content_graph(&self, workspace: &WorkspaceName) -> Result<&dyn ContentGraph>;
}

/// The content graph of one workspace, across all dimension space points
pub trait ContentGraph {
    fn workspace_name(&self) -> &WorkspaceName;

    fn find_node_aggregate_by_id(&self, id: &NodeAggregateId) -> Option<NodeAggregate>;

    /// View of the graph at one dimension space point
    fn subgraph(
        &self,
        dimension_space_point: &DimensionSpacePoint,
        visibility: VisibilityConstraints,
    ) -> Box<dyn ContentSubgraph + '_>;
}

/// The graph as seen from one dimension space point
pub trait ContentSubgraph {
    fn dimension_space_point(&self) -> &DimensionSpacePoint;

    fn find_node_by_id(&self, id: &NodeAggregateId) -> Option<NodeSnapshot>;

    /// Targets of the outgoing references named `reference_name`, in order
    ///
    /// Targets not visible in this subgraph are omitted.
    fn find_references(&self, source: &NodeAggregateId, reference_name: &str)
        -> Vec<NodeAggregateId>;

    /// Whether the source stores any target under `reference_name`
    ///
    /// Unlike `find_references`, hidden targets count.
    fn has_references(&self, source: &NodeAggregateId, reference_name: &str) -> bool;
}
