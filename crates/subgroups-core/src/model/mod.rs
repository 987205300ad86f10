pub mod node;
pub mod node_type;

pub use node::{NodeAggregate, NodeSnapshot, PropertyValues};
pub use node_type::{
    ContentSubgroupOptions, MigrationEntry, MigrationTable, NodeTypeDescriptor, NodeTypeUi,
    PropertyDeclaration, TARGET_NODE_TYPE_NAME,
};
