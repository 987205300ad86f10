//! Core types shared across the content subgroups crates
//!
//! This crate provides the identifier types used by the rewrite engine, the
//! schema loader and the logging facility:
//!
//! - **Identifiers**: WorkspaceName, NodeAggregateId, NodeTypeName, DimensionSpacePoint
//! - **Correlation**: RequestId for tagging one hook invocation
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{DimensionSpacePoint, NodeAggregateId, NodeTypeName, RequestId, WorkspaceName};
