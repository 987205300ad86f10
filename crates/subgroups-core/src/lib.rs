//! Subgroups Core - node type change with field remapping
//!
//! Hooks into a content repository's command handling:
//! - `type_change`: rewrites a `targetNodeTypeName` write into an ordered
//!   batch (reference clears, type change, property/reference moves)
//! - `creation`: applies a type picked in the creation dialog
//! - `data_source`: grouped select options for the type picker
//! - `registration`: explicit startup wiring of the above
//!
//! The host's schema and content graph are reached through the read-only
//! `node_types` and `graph` seams; the in-memory implementations and
//! `graph::apply` replay batches with the host's write semantics.

pub mod command_hook;
pub mod commands;
pub mod creation;
pub mod data_source;
pub mod errors;
pub mod graph;
pub mod logging_facility;
pub mod model;
pub mod node_types;
pub mod registration;
pub mod type_change;

// Re-export commonly used types
pub use command_hook::{CommandHook, CommandHookFactory, CommandHooks, HostDependencies};
pub use commands::{Command, CommandBatch, CommandKind, PublishedEvents};
pub use errors::{ExError, ExErrorKind, Result, SubgroupsError};
pub use graph::{apply, apply_batch, InMemoryContentRepository};
pub use model::{NodeTypeDescriptor, TARGET_NODE_TYPE_NAME};
pub use node_types::{InMemoryNodeTypeRegistry, NodeTypeRegistry};
pub use registration::Registrations;
pub use type_change::NodeTypeChangedCommandHook;
