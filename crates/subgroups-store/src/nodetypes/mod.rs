//! Node type configuration
//!
//! Provides:
//! - Node Types Format v0 schema
//! - YAML parser with load-time validation of migration tables

pub mod format_v0;
pub mod parser;

pub use format_v0::{NodeTypeEntryV0, NodeTypesV0};
pub use parser::{parse_node_types_file, parse_node_types_str};
