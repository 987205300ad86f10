//! Content fixtures
//!
//! Provides:
//! - Content Format v0 schema (workspaces, nodes, per-variant values)
//! - Loader building an in-memory content repository
//! - Command file parsing for replaying host commands

pub mod format_v0;
pub mod loader;

pub use format_v0::{ContentNodeV0, ContentV0, ContentVariantV0, ContentWorkspaceV0};
pub use loader::{
    load_content_file, load_content_str, parse_command_file, parse_command_str,
};
