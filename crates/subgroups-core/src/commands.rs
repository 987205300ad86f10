//! Command types exchanged with the host's command pipeline
//!
//! The rewrite engine only constructs and orders these; executing them is
//! the host's job (see `graph::apply` for the in-memory reference semantics).

use serde::{Deserialize, Serialize};
use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, NodeTypeName, WorkspaceName};

use crate::model::PropertyValues;

/// How the host resolves child nodes the new type no longer allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildConstraintConflictStrategy {
    /// Remove disallowed children
    Delete,
    /// Defer to the tethered children the new type promises
    PromisedCascade,
}

/// Additive (patch-style) property write for one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetNodeProperties {
    pub workspace: WorkspaceName,
    pub node_aggregate_id: NodeAggregateId,
    pub origin_dimension_space_point: DimensionSpacePoint,
    pub property_values: PropertyValues,
}

/// Switch the node type of a whole aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNodeAggregateType {
    pub workspace: WorkspaceName,
    pub node_aggregate_id: NodeAggregateId,
    pub new_node_type_name: NodeTypeName,
    pub strategy: ChildConstraintConflictStrategy,
}

/// Targets for one reference name; an empty list clears the name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReferencesForName {
    pub reference_name: String,
    #[serde(default)]
    pub targets: Vec<NodeAggregateId>,
}

/// Replace the targets of the listed reference names for one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetNodeReferences {
    pub workspace: WorkspaceName,
    pub source_node_aggregate_id: NodeAggregateId,
    pub source_origin_dimension_space_point: DimensionSpacePoint,
    pub references: Vec<NodeReferencesForName>,
}

/// Create a node aggregate with its first variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNodeAggregateWithNode {
    pub workspace: WorkspaceName,
    pub node_aggregate_id: NodeAggregateId,
    pub node_type_name: NodeTypeName,
    pub origin_dimension_space_point: DimensionSpacePoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node_aggregate_id: Option<NodeAggregateId>,
    #[serde(default)]
    pub initial_property_values: PropertyValues,
}

/// Every command the plugin reads or emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    SetNodeProperties(SetNodeProperties),
    ChangeNodeAggregateType(ChangeNodeAggregateType),
    SetNodeReferences(SetNodeReferences),
    CreateNodeAggregateWithNode(CreateNodeAggregateWithNode),
}

/// Coarse classification used for ordering checks and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetProperties,
    ChangeType,
    SetReferences,
    ClearReferences,
    CreateNode,
}

impl Command {
    pub fn set_property(
        workspace: WorkspaceName,
        node_aggregate_id: NodeAggregateId,
        origin: DimensionSpacePoint,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        let mut property_values = PropertyValues::new();
        property_values.insert(name.into(), value);
        Command::SetNodeProperties(SetNodeProperties {
            workspace,
            node_aggregate_id,
            origin_dimension_space_point: origin,
            property_values,
        })
    }

    pub fn change_node_aggregate_type(
        workspace: WorkspaceName,
        node_aggregate_id: NodeAggregateId,
        new_node_type_name: NodeTypeName,
        strategy: ChildConstraintConflictStrategy,
    ) -> Self {
        Command::ChangeNodeAggregateType(ChangeNodeAggregateType {
            workspace,
            node_aggregate_id,
            new_node_type_name,
            strategy,
        })
    }

    pub fn set_references(
        workspace: WorkspaceName,
        source: NodeAggregateId,
        origin: DimensionSpacePoint,
        reference_name: impl Into<String>,
        targets: Vec<NodeAggregateId>,
    ) -> Self {
        Command::SetNodeReferences(SetNodeReferences {
            workspace,
            source_node_aggregate_id: source,
            source_origin_dimension_space_point: origin,
            references: vec![NodeReferencesForName {
                reference_name: reference_name.into(),
                targets,
            }],
        })
    }

    pub fn clear_references(
        workspace: WorkspaceName,
        source: NodeAggregateId,
        origin: DimensionSpacePoint,
        reference_name: impl Into<String>,
    ) -> Self {
        Self::set_references(workspace, source, origin, reference_name, Vec::new())
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SetNodeProperties(_) => CommandKind::SetProperties,
            Command::ChangeNodeAggregateType(_) => CommandKind::ChangeType,
            Command::SetNodeReferences(cmd) => {
                if cmd.references.iter().all(|r| r.targets.is_empty()) {
                    CommandKind::ClearReferences
                } else {
                    CommandKind::SetReferences
                }
            }
            Command::CreateNodeAggregateWithNode(_) => CommandKind::CreateNode,
        }
    }

    pub fn workspace(&self) -> &WorkspaceName {
        match self {
            Command::SetNodeProperties(cmd) => &cmd.workspace,
            Command::ChangeNodeAggregateType(cmd) => &cmd.workspace,
            Command::SetNodeReferences(cmd) => &cmd.workspace,
            Command::CreateNodeAggregateWithNode(cmd) => &cmd.workspace,
        }
    }

    /// Aggregate the command writes to
    pub fn node_aggregate_id(&self) -> &NodeAggregateId {
        match self {
            Command::SetNodeProperties(cmd) => &cmd.node_aggregate_id,
            Command::ChangeNodeAggregateType(cmd) => &cmd.node_aggregate_id,
            Command::SetNodeReferences(cmd) => &cmd.source_node_aggregate_id,
            Command::CreateNodeAggregateWithNode(cmd) => &cmd.node_aggregate_id,
        }
    }
}

macro_rules! impl_into_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Command {
                fn from(cmd: $variant) -> Self {
                    Command::$variant(cmd)
                }
            }
        )*
    };
}

impl_into_command!(
    SetNodeProperties,
    ChangeNodeAggregateType,
    SetNodeReferences,
    CreateNodeAggregateWithNode,
);

/// Ordered command list; position is execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandBatch {
    commands: Vec<Command>,
}

impl CommandBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(command: impl Into<Command>) -> Self {
        Self {
            commands: vec![command.into()],
        }
    }

    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    /// Append all commands of `other`, keeping their order
    pub fn append(&mut self, other: CommandBatch) {
        self.commands.extend(other.commands);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_vec(self) -> Vec<Command> {
        self.commands
    }

    pub fn kinds(&self) -> Vec<CommandKind> {
        self.commands.iter().map(Command::kind).collect()
    }
}

impl From<Vec<Command>> for CommandBatch {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

impl FromIterator<Command> for CommandBatch {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CommandBatch {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandBatch {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Event published by the host for a handled command
///
/// Hooks receive these for context only; the payload is host-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub stream_name: String,
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishedEvents(Vec<PublishedEvent>);

impl PublishedEvents {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(events: Vec<PublishedEvent>) -> Self {
        Self(events)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PublishedEvent> {
        self.0.iter()
    }
}
