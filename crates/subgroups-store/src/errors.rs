//! Error handling for subgroups-store
//!
//! Wraps subgroups-core ExError with loader-specific helpers

use subgroups_core::errors::{ExError, ExErrorKind, SubgroupsError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a node type schema validation error
pub fn schema_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("node_types_parse")
        .with_message(reason.to_string())
}

/// Create a content fixture validation error
pub fn content_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("content_parse")
        .with_message(reason.to_string())
}

/// Create an unsupported schema version error
pub fn unsupported_schema_version(op: &str, found: u32) -> ExError {
    ExError::new(ExErrorKind::UnsupportedSchemaVersion)
        .with_op(op.to_string())
        .with_message(format!("Unsupported schema_version: {}. Expected 0", found))
}

/// Create a YAML parse error
pub fn yaml_error(op: &str, err: serde_yaml::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(format!("YAML parse error: {}", err))
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Convert a domain error raised while loading, keeping the loader as `op`
pub fn from_domain(op: &str, err: SubgroupsError) -> ExError {
    ExError::from(err).with_op(op.to_string())
}
