//! Identifier newtypes for the host content repository
//!
//! The host owns the meaning of these values; this crate only carries them
//! around and compares them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from any string-like value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Name of a content workspace (e.g. `live` or a user workspace)
    WorkspaceName
);

string_id!(
    /// Identity of a node across all of its dimension variants
    NodeAggregateId
);

string_id!(
    /// Fully qualified node type name, e.g. `Vendor.Site:Content.Text`
    NodeTypeName
);

/// A coordinate in the dimension space, e.g. `{language: en}`
///
/// Dimensions are kept sorted so two points with the same coordinates
/// compare and hash equal regardless of construction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSpacePoint(BTreeMap<String, String>);

impl DimensionSpacePoint {
    /// The point of a dimensionless content repository
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a point from `(dimension, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of a single dimension, if set
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.0.get(dimension).map(String::as_str)
    }

    pub fn coordinates(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl std::fmt::Display for DimensionSpacePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        f.write_str("}")
    }
}

/// Unique identifier for a single hook invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
