//! Functional-boundary apply for the in-memory content repository
//!
//! Executes commands with the host's write semantics so rewritten batches can
//! be replayed in tests and from the CLI:
//!
//! - `SetNodeProperties` is additive: listed keys are written, others are
//!   untouched; a `null` value unsets the key
//! - `SetNodeReferences` replaces the targets of each listed name; an empty
//!   target list clears the name
//! - `ChangeNodeAggregateType` switches the type of every variant
//! - `CreateNodeAggregateWithNode` adds a new aggregate with one variant
//!
//! ## Atomicity Contract
//!
//! `apply()` and `apply_batch()` take ownership of the state and either
//! return the new state or an error; the caller's previous state (if it kept
//! a clone) stays valid.

use crate::commands::{Command, CommandBatch};
use crate::errors::{Result, SubgroupsError};
use crate::graph::in_memory::{AggregateRecord, InMemoryContentRepository, NodeVariant};
use std::collections::BTreeMap;

/// Apply a single command, returning the new repository state
///
/// # Errors
///
/// Returns `WorkspaceNotFound`, `NodeAggregateNotFound` or
/// `NodeVariantNotFound` when the command addresses something that does not
/// exist, and `Internal` when creating an aggregate that already exists.
///
/// # Example
///
/// ```
/// use subgroups_core::commands::Command;
/// use subgroups_core::graph::{apply, InMemoryContentRepository};
/// use subgroups_core_types::DimensionSpacePoint;
///
/// let mut state = InMemoryContentRepository::new();
/// let dsp = DimensionSpacePoint::empty();
/// state
///     .graph_mut(&"live".into())
///     .insert_node("n1", "Vendor:Text", dsp.clone(), Default::default());
///
/// let cmd = Command::set_property("live".into(), "n1".into(), dsp.clone(), "caption", "Hi".into());
/// let state = apply(state, &cmd).unwrap();
/// let variant = state.graph(&"live".into()).unwrap().variant(&"n1".into(), &dsp).unwrap();
/// assert_eq!(variant.properties["caption"], "Hi");
/// ```
pub fn apply(mut state: InMemoryContentRepository, cmd: &Command) -> Result<InMemoryContentRepository> {
    match cmd {
        Command::SetNodeProperties(cmd) => {
            let graph = state.existing_graph_mut(&cmd.workspace)?;
            let variant =
                graph.variant_mut(&cmd.node_aggregate_id, &cmd.origin_dimension_space_point)?;
            for (name, value) in &cmd.property_values {
                if value.is_null() {
                    variant.properties.remove(name);
                } else {
                    variant.properties.insert(name.clone(), value.clone());
                }
            }
            Ok(state)
        }

        Command::ChangeNodeAggregateType(cmd) => {
            let graph = state.existing_graph_mut(&cmd.workspace)?;
            graph.aggregate_mut(&cmd.node_aggregate_id)?.node_type_name =
                cmd.new_node_type_name.clone();
            Ok(state)
        }

        Command::SetNodeReferences(cmd) => {
            let graph = state.existing_graph_mut(&cmd.workspace)?;
            for references in &cmd.references {
                graph.set_references(
                    &cmd.source_node_aggregate_id,
                    &cmd.source_origin_dimension_space_point,
                    references.reference_name.clone(),
                    references.targets.clone(),
                )?;
            }
            Ok(state)
        }

        Command::CreateNodeAggregateWithNode(cmd) => {
            let graph = state.graph_mut(&cmd.workspace);
            if graph.aggregates.contains_key(&cmd.node_aggregate_id) {
                return Err(SubgroupsError::Internal {
                    message: format!("node aggregate {} already exists", cmd.node_aggregate_id),
                });
            }
            let mut variants = BTreeMap::new();
            variants.insert(
                cmd.origin_dimension_space_point.clone(),
                NodeVariant {
                    properties: cmd.initial_property_values.clone(),
                    ..NodeVariant::default()
                },
            );
            graph.aggregates.insert(
                cmd.node_aggregate_id.clone(),
                AggregateRecord {
                    node_type_name: cmd.node_type_name.clone(),
                    parent: cmd.parent_node_aggregate_id.clone(),
                    variants,
                },
            );
            Ok(state)
        }
    }
}

/// Apply every command of a batch in order, all-or-nothing
///
/// # Errors
///
/// Returns the first command's error; no partially applied state is returned.
pub fn apply_batch(
    state: InMemoryContentRepository,
    batch: &CommandBatch,
) -> Result<InMemoryContentRepository> {
    batch.iter().try_fold(state, apply)
}
