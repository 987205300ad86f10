//! Node type change with field remapping
//!
//! A `targetNodeTypeName` write is rewritten into a type change plus the
//! property and reference moves declared by the destination type's
//! migration table for the node's current type.

pub mod hook;
pub mod planner;
pub mod sequencer;
pub mod trigger;

pub use hook::{NodeTypeChangedCommandHook, NodeTypeChangedCommandHookFactory};
pub use planner::{MigrationPlan, MigrationPlanner};
pub use sequencer::sequence;
pub use trigger::{detect, TypeChangeIntent};
