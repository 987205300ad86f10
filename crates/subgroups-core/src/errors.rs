use subgroups_core_types::RequestId;
use thiserror::Error;

/// Result type alias using SubgroupsError
pub type Result<T> = std::result::Result<T, SubgroupsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that hosts and tests can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    InvalidMigration,
    UnsupportedSchemaVersion,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::InvalidMigration => "ERR_INVALID_MIGRATION",
            ExErrorKind::UnsupportedSchemaVersion => "ERR_UNSUPPORTED_SCHEMA_VERSION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context a
/// host needs to report the failure (operation, offending entity, request).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (node type name, node aggregate id, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for the type-change rewriter and its collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubgroupsError {
    /// Node type is not known to the schema registry
    #[error("Node type not found: {node_type_name:?}")]
    NodeTypeNotFound { node_type_name: String },

    /// Node aggregate does not exist in the workspace's content graph
    #[error("Node aggregate not found: {node_aggregate_id} in workspace {workspace}")]
    NodeAggregateNotFound {
        workspace: String,
        node_aggregate_id: String,
    },

    /// Workspace has no content graph
    #[error("Workspace not found: {workspace}")]
    WorkspaceNotFound { workspace: String },

    /// Variant of a node aggregate does not exist in the given dimension space point
    #[error("Node {node_aggregate_id} has no variant in {dimension_space_point}")]
    NodeVariantNotFound {
        node_aggregate_id: String,
        dimension_space_point: String,
    },

    /// `targetNodeTypeName` was written with something other than a string
    #[error("Invalid target node type name: {reason}")]
    InvalidTargetNodeTypeName { reason: String },

    /// Migration table entry failed validation
    #[error("Invalid migration entry on {node_type_name} (from {source_node_type_name}): {reason}")]
    InvalidMigrationEntry {
        node_type_name: String,
        source_node_type_name: String,
        reason: String,
    },

    /// Node type declaration failed validation
    #[error("Invalid node type {node_type_name}: {reason}")]
    InvalidNodeType {
        node_type_name: String,
        reason: String,
    },

    /// Node type registered twice
    #[error("Node type already registered: {node_type_name}")]
    DuplicateNodeType { node_type_name: String },

    /// Component registered twice under the same identifier
    #[error("Duplicate registration: {identifier}")]
    DuplicateRegistration { identifier: String },

    /// No component registered under the identifier
    #[error("Unknown registration: {identifier}")]
    UnknownRegistration { identifier: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SubgroupsError {
    pub(crate) fn node_type_not_found(name: impl Into<String>) -> Self {
        SubgroupsError::NodeTypeNotFound {
            node_type_name: name.into(),
        }
    }
}

/// Conversion from SubgroupsError to ExError
impl From<SubgroupsError> for ExError {
    fn from(err: SubgroupsError) -> Self {
        let message = err.to_string();
        match err {
            SubgroupsError::NodeTypeNotFound { node_type_name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(node_type_name)
                    .with_op("get_node_type")
                    .with_message(message)
            }

            SubgroupsError::NodeAggregateNotFound {
                node_aggregate_id, ..
            } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(node_aggregate_id)
                .with_op("find_node_aggregate")
                .with_message(message),

            SubgroupsError::WorkspaceNotFound { workspace } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(workspace)
                .with_op("content_graph")
                .with_message(message),

            SubgroupsError::NodeVariantNotFound {
                node_aggregate_id, ..
            } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(node_aggregate_id)
                .with_message(message),

            SubgroupsError::InvalidTargetNodeTypeName { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            SubgroupsError::InvalidMigrationEntry { node_type_name, .. } => {
                ExError::new(ExErrorKind::InvalidMigration)
                    .with_entity_id(node_type_name)
                    .with_message(message)
            }

            SubgroupsError::InvalidNodeType { node_type_name, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(node_type_name)
                    .with_message(message)
            }

            SubgroupsError::DuplicateNodeType { node_type_name } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(node_type_name)
                    .with_message(message)
            }

            SubgroupsError::DuplicateRegistration { identifier } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(identifier)
                    .with_op("register")
                    .with_message(message)
            }

            SubgroupsError::UnknownRegistration { identifier } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(identifier)
                    .with_op("lookup_registration")
                    .with_message(message)
            }

            SubgroupsError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            SubgroupsError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to SubgroupsError
impl From<serde_json::Error> for SubgroupsError {
    fn from(err: serde_json::Error) -> Self {
        SubgroupsError::Serialization {
            message: err.to_string(),
        }
    }
}
