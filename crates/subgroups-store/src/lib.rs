//! Subgroups Store - YAML loaders for node type schemas and content fixtures
//!
//! Provides:
//! - Node Types Format v0 parser building a validated node type registry
//! - Content Format v0 loader building an in-memory content repository
//! - Command file parsing for replaying host commands

pub mod content;
pub mod errors;
pub mod nodetypes;

// Re-export key types
pub use content::{load_content_file, load_content_str, parse_command_file, parse_command_str};
pub use errors::Result;
pub use nodetypes::{parse_node_types_file, parse_node_types_str};
