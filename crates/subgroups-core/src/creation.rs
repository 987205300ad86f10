//! Node creation handlers
//!
//! The host builds the commands for a node created through its creation
//! dialog and then passes them through every registered handler together
//! with the dialog's elements. `TypeSelectionNodeCreationHandler` lets the
//! editor pick the concrete type in the dialog: the node is created with the
//! group type and then changed to the picked one.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::command_hook::HostDependencies;
use crate::commands::{
    ChildConstraintConflictStrategy, Command, CommandBatch, CreateNodeAggregateWithNode,
};
use crate::errors::Result;
use crate::model::TARGET_NODE_TYPE_NAME;
use crate::node_types::NodeTypeRegistry;
use crate::{log_op_end, log_op_error, log_op_start};

/// Values entered in the creation dialog, by element name
pub type NodeCreationElements = BTreeMap<String, serde_json::Value>;

/// Commands that create one node: the creation itself plus follow-ups
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCreationCommands {
    pub first: CreateNodeAggregateWithNode,
    pub additional: CommandBatch,
}

impl NodeCreationCommands {
    pub fn new(first: CreateNodeAggregateWithNode) -> Self {
        Self {
            first,
            additional: CommandBatch::empty(),
        }
    }

    pub fn with_additional(mut self, command: impl Into<Command>) -> Self {
        self.additional.push(command);
        self
    }

    /// Everything in execution order
    pub fn into_batch(self) -> CommandBatch {
        let mut batch = CommandBatch::single(self.first);
        batch.append(self.additional);
        batch
    }
}

pub trait NodeCreationHandler: Send + Sync {
    /// # Errors
    ///
    /// Any error aborts node creation.
    fn handle(
        &self,
        commands: NodeCreationCommands,
        elements: &NodeCreationElements,
    ) -> Result<NodeCreationCommands>;
}

pub trait NodeCreationHandlerFactory: Send + Sync {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn NodeCreationHandler>;
}

/// Changes a freshly created group node to the type picked in the dialog
pub struct TypeSelectionNodeCreationHandler {
    node_types: Arc<dyn NodeTypeRegistry>,
}

impl TypeSelectionNodeCreationHandler {
    pub fn new(node_types: Arc<dyn NodeTypeRegistry>) -> Self {
        Self { node_types }
    }

    fn handle_impl(
        &self,
        commands: NodeCreationCommands,
        elements: &NodeCreationElements,
    ) -> Result<NodeCreationCommands> {
        let created_type = self.node_types.get_node_type(&commands.first.node_type_name)?;
        if !created_type.is_type_selector() {
            return Ok(commands);
        }

        let picked = match elements.get(TARGET_NODE_TYPE_NAME).and_then(|v| v.as_str()) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(commands),
        };
        let picked_type = self.node_types.get_node_type(&picked.into())?;

        let change_type = Command::change_node_aggregate_type(
            commands.first.workspace.clone(),
            commands.first.node_aggregate_id.clone(),
            picked_type.name.clone(),
            ChildConstraintConflictStrategy::PromisedCascade,
        );
        Ok(commands.with_additional(change_type))
    }
}

impl NodeCreationHandler for TypeSelectionNodeCreationHandler {
    fn handle(
        &self,
        commands: NodeCreationCommands,
        elements: &NodeCreationElements,
    ) -> Result<NodeCreationCommands> {
        log_op_start!(
            "type_selection_creation",
            node_aggregate_id = %commands.first.node_aggregate_id,
            node_type = %commands.first.node_type_name
        );
        let start = std::time::Instant::now();

        let result = self.handle_impl(commands, elements).map_err(|e| {
            log_op_error!(
                "type_selection_creation",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "type_selection_creation",
            duration_ms = start.elapsed().as_millis() as u64,
            batch_len = result.additional.len()
        );
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSelectionNodeCreationHandlerFactory;

impl NodeCreationHandlerFactory for TypeSelectionNodeCreationHandlerFactory {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn NodeCreationHandler> {
        Box::new(TypeSelectionNodeCreationHandler::new(Arc::clone(
            &dependencies.node_types,
        )))
    }
}
