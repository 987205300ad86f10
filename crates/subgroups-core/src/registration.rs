//! Startup registration table
//!
//! The host wires plugin components in explicitly: each factory is stored
//! under an identifier and built once the host's dependencies exist.
//! Command hooks and creation handlers run in registration order.

use crate::command_hook::{CommandHookFactory, CommandHooks, HostDependencies};
use crate::creation::{
    NodeCreationCommands, NodeCreationElements, NodeCreationHandler, NodeCreationHandlerFactory,
    TypeSelectionNodeCreationHandlerFactory,
};
use crate::data_source::{
    DataSource, DataSourceFactory, TargetNodeTypesDataSource, TargetNodeTypesDataSourceFactory,
};
use crate::errors::{Result, SubgroupsError};
use crate::type_change::NodeTypeChangedCommandHookFactory;

pub const NODE_TYPE_CHANGED_HOOK: &str = "contentsubgroups-node-type-changed";
pub const TYPE_SELECTION_CREATION_HANDLER: &str = "contentsubgroups-type-selection";
pub const TARGET_NODE_TYPES_DATA_SOURCE: &str = TargetNodeTypesDataSource::IDENTIFIER;

#[derive(Default)]
pub struct Registrations {
    command_hooks: Vec<(String, Box<dyn CommandHookFactory>)>,
    creation_handlers: Vec<(String, Box<dyn NodeCreationHandlerFactory>)>,
    data_sources: Vec<(String, Box<dyn DataSourceFactory>)>,
}

fn ensure_unique<T>(entries: &[(String, T)], identifier: &str) -> Result<()> {
    if entries.iter().any(|(id, _)| id == identifier) {
        return Err(SubgroupsError::DuplicateRegistration {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// This plugin's hook, creation handler and data source
    pub fn with_defaults() -> Self {
        let mut registrations = Self::new();
        registrations.command_hooks.push((
            NODE_TYPE_CHANGED_HOOK.to_string(),
            Box::new(NodeTypeChangedCommandHookFactory),
        ));
        registrations.creation_handlers.push((
            TYPE_SELECTION_CREATION_HANDLER.to_string(),
            Box::new(TypeSelectionNodeCreationHandlerFactory),
        ));
        registrations.data_sources.push((
            TARGET_NODE_TYPES_DATA_SOURCE.to_string(),
            Box::new(TargetNodeTypesDataSourceFactory),
        ));
        registrations
    }

    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the identifier is taken.
    pub fn register_command_hook(
        &mut self,
        identifier: impl Into<String>,
        factory: Box<dyn CommandHookFactory>,
    ) -> Result<()> {
        let identifier = identifier.into();
        ensure_unique(&self.command_hooks, &identifier)?;
        self.command_hooks.push((identifier, factory));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the identifier is taken.
    pub fn register_node_creation_handler(
        &mut self,
        identifier: impl Into<String>,
        factory: Box<dyn NodeCreationHandlerFactory>,
    ) -> Result<()> {
        let identifier = identifier.into();
        ensure_unique(&self.creation_handlers, &identifier)?;
        self.creation_handlers.push((identifier, factory));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DuplicateRegistration` if the identifier is taken.
    pub fn register_data_source(
        &mut self,
        identifier: impl Into<String>,
        factory: Box<dyn DataSourceFactory>,
    ) -> Result<()> {
        let identifier = identifier.into();
        ensure_unique(&self.data_sources, &identifier)?;
        self.data_sources.push((identifier, factory));
        Ok(())
    }

    pub fn command_hook_identifiers(&self) -> Vec<&str> {
        self.command_hooks.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn data_source_identifiers(&self) -> Vec<&str> {
        self.data_sources.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn build_command_hooks(&self, dependencies: &HostDependencies) -> CommandHooks {
        self.command_hooks
            .iter()
            .map(|(_, factory)| factory.build(dependencies))
            .collect()
    }

    pub fn build_node_creation_handlers(
        &self,
        dependencies: &HostDependencies,
    ) -> NodeCreationHandlers {
        NodeCreationHandlers {
            handlers: self
                .creation_handlers
                .iter()
                .map(|(_, factory)| factory.build(dependencies))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns `UnknownRegistration` if nothing is registered under `identifier`.
    pub fn build_data_source(
        &self,
        identifier: &str,
        dependencies: &HostDependencies,
    ) -> Result<Box<dyn DataSource>> {
        self.data_sources
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, factory)| factory.build(dependencies))
            .ok_or_else(|| SubgroupsError::UnknownRegistration {
                identifier: identifier.to_string(),
            })
    }
}

/// Creation handlers in registration order
pub struct NodeCreationHandlers {
    handlers: Vec<Box<dyn NodeCreationHandler>>,
}

impl NodeCreationHandlers {
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Thread the commands through every handler
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub fn handle(
        &self,
        commands: NodeCreationCommands,
        elements: &NodeCreationElements,
    ) -> Result<NodeCreationCommands> {
        self.handlers
            .iter()
            .try_fold(commands, |commands, handler| handler.handle(commands, elements))
    }
}
