//! Schema registry seam
//!
//! The host owns the node type schema; the rewrite engine only looks types up
//! by name. `InMemoryNodeTypeRegistry` validates descriptors on registration
//! so nothing malformed reaches rewrite time.

use std::collections::BTreeMap;
use subgroups_core_types::NodeTypeName;

use crate::errors::{Result, SubgroupsError};
use crate::model::NodeTypeDescriptor;

/// Read access to the host's node type schema
pub trait NodeTypeRegistry: Send + Sync {
    /// Look a type up by name
    ///
    /// # Errors
    ///
    /// Returns `NodeTypeNotFound` for unknown (including empty) names.
    fn get_node_type(&self, name: &NodeTypeName) -> Result<&NodeTypeDescriptor>;

    /// All known types, ordered by name
    fn node_types(&self) -> Vec<&NodeTypeDescriptor>;

    fn has_node_type(&self, name: &NodeTypeName) -> bool {
        self.get_node_type(name).is_ok()
    }
}

/// Registry backed by a sorted map
#[derive(Debug, Clone, Default)]
pub struct InMemoryNodeTypeRegistry {
    node_types: BTreeMap<NodeTypeName, NodeTypeDescriptor>,
}

impl InMemoryNodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, validating each one
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicate descriptor.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = NodeTypeDescriptor>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Validate and add a descriptor
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNodeType` if the name is taken, or the validation
    /// error of `NodeTypeDescriptor::validate`.
    pub fn register(&mut self, descriptor: NodeTypeDescriptor) -> Result<()> {
        if self.node_types.contains_key(&descriptor.name) {
            return Err(SubgroupsError::DuplicateNodeType {
                node_type_name: descriptor.name.to_string(),
            });
        }
        let descriptor = descriptor.validate()?;
        self.node_types.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.node_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty()
    }
}

impl NodeTypeRegistry for InMemoryNodeTypeRegistry {
    fn get_node_type(&self, name: &NodeTypeName) -> Result<&NodeTypeDescriptor> {
        self.node_types
            .get(name)
            .ok_or_else(|| SubgroupsError::node_type_not_found(name.as_str()))
    }

    fn node_types(&self) -> Vec<&NodeTypeDescriptor> {
        self.node_types.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_and_empty_names_are_not_found() {
        let registry =
            InMemoryNodeTypeRegistry::from_descriptors([NodeTypeDescriptor::new("Vendor:A")])
                .unwrap();

        assert!(registry.has_node_type(&"Vendor:A".into()));
        assert!(matches!(
            registry.get_node_type(&"Vendor:Missing".into()),
            Err(SubgroupsError::NodeTypeNotFound { .. })
        ));
        assert!(matches!(
            registry.get_node_type(&"".into()),
            Err(SubgroupsError::NodeTypeNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = InMemoryNodeTypeRegistry::from_descriptors([
            NodeTypeDescriptor::new("Vendor:A"),
            NodeTypeDescriptor::new("Vendor:A"),
        ]);
        assert!(matches!(
            result,
            Err(SubgroupsError::DuplicateNodeType { .. })
        ));
    }

    #[test]
    fn test_registration_validates_migration_tables() {
        let invalid = NodeTypeDescriptor::new("Vendor:B")
            .with_type_selector()
            .with_migration_from("Vendor:A", [("caption", "")]);
        let result = InMemoryNodeTypeRegistry::from_descriptors([invalid]);
        assert!(matches!(
            result,
            Err(SubgroupsError::InvalidMigrationEntry { .. })
        ));
    }
}
