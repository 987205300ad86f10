//! Command hook seam
//!
//! The host calls every registered hook around each command it handles. A
//! hook may replace the command before it is handled and may return
//! additional commands afterwards; it never writes to the graph itself.

use std::sync::Arc;

use crate::commands::{Command, CommandBatch, PublishedEvents};
use crate::errors::Result;
use crate::graph::ContentGraphReadModel;
use crate::node_types::NodeTypeRegistry;

/// Hook into the host's command handling
pub trait CommandHook: Send + Sync {
    /// Called before the host handles `command`; returns the command to handle
    fn on_before_command_handled(&self, command: Command) -> Command {
        command
    }

    /// Called after the host handled `command` and published `events`
    ///
    /// Returns the commands the host should handle next, in order.
    ///
    /// # Errors
    ///
    /// Any error aborts the host's surrounding transaction; no partial batch
    /// is returned.
    fn on_after_command_handled(
        &self,
        command: &Command,
        events: &PublishedEvents,
    ) -> Result<CommandBatch>;
}

/// Read-only host services handed to factories at startup
#[derive(Clone)]
pub struct HostDependencies {
    pub node_types: Arc<dyn NodeTypeRegistry>,
    pub content_graphs: Arc<dyn ContentGraphReadModel>,
}

impl HostDependencies {
    pub fn new(
        node_types: Arc<dyn NodeTypeRegistry>,
        content_graphs: Arc<dyn ContentGraphReadModel>,
    ) -> Self {
        Self {
            node_types,
            content_graphs,
        }
    }
}

/// Builds a command hook once per content repository
pub trait CommandHookFactory: Send + Sync {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn CommandHook>;
}

/// Ordered set of hooks, invoked as one
#[derive(Default)]
pub struct CommandHooks {
    hooks: Vec<Box<dyn CommandHook>>,
}

impl CommandHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hook: Box<dyn CommandHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Pass the command through every hook in registration order
    pub fn on_before_command_handled(&self, command: Command) -> Command {
        self.hooks
            .iter()
            .fold(command, |command, hook| hook.on_before_command_handled(command))
    }

    /// Concatenate every hook's additional commands in registration order
    ///
    /// # Errors
    ///
    /// Returns the first hook error.
    pub fn on_after_command_handled(
        &self,
        command: &Command,
        events: &PublishedEvents,
    ) -> Result<CommandBatch> {
        let mut batch = CommandBatch::empty();
        for hook in &self.hooks {
            batch.append(hook.on_after_command_handled(command, events)?);
        }
        Ok(batch)
    }
}

impl FromIterator<Box<dyn CommandHook>> for CommandHooks {
    fn from_iter<I: IntoIterator<Item = Box<dyn CommandHook>>>(iter: I) -> Self {
        Self {
            hooks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ChildConstraintConflictStrategy;
    use crate::errors::SubgroupsError;
    use subgroups_core_types::DimensionSpacePoint;

    struct Echo(&'static str);

    impl CommandHook for Echo {
        fn on_after_command_handled(
            &self,
            command: &Command,
            _events: &PublishedEvents,
        ) -> Result<CommandBatch> {
            Ok(CommandBatch::single(Command::change_node_aggregate_type(
                command.workspace().clone(),
                command.node_aggregate_id().clone(),
                self.0.into(),
                ChildConstraintConflictStrategy::Delete,
            )))
        }
    }

    struct Failing;

    impl CommandHook for Failing {
        fn on_after_command_handled(
            &self,
            _command: &Command,
            _events: &PublishedEvents,
        ) -> Result<CommandBatch> {
            Err(SubgroupsError::Internal {
                message: "boom".to_string(),
            })
        }
    }

    fn incoming() -> Command {
        Command::clear_references("live".into(), "n1".into(), DimensionSpacePoint::empty(), "x")
    }

    #[test]
    fn test_hooks_concatenate_in_registration_order() {
        let hooks: CommandHooks = vec![
            Box::new(Echo("Vendor:A")) as Box<dyn CommandHook>,
            Box::new(Echo("Vendor:B")),
        ]
        .into_iter()
        .collect();

        let batch = hooks
            .on_after_command_handled(&incoming(), &PublishedEvents::empty())
            .unwrap();
        let types: Vec<String> = batch
            .iter()
            .filter_map(|c| match c {
                Command::ChangeNodeAggregateType(c) => Some(c.new_node_type_name.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(types, vec!["Vendor:A", "Vendor:B"]);
    }

    #[test]
    fn test_first_error_aborts() {
        let mut hooks = CommandHooks::new();
        hooks.push(Box::new(Echo("Vendor:A")));
        hooks.push(Box::new(Failing));

        let result = hooks.on_after_command_handled(&incoming(), &PublishedEvents::empty());
        assert!(matches!(result, Err(SubgroupsError::Internal { .. })));
    }

    #[test]
    fn test_before_is_identity_by_default() {
        let hooks: CommandHooks = std::iter::once(Box::new(Echo("Vendor:A")) as Box<dyn CommandHook>).collect();
        assert_eq!(hooks.on_before_command_handled(incoming()), incoming());
    }
}
