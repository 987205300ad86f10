//! Typed node type configuration
//!
//! The host's free-form options bag is replaced by explicit structures. The
//! only part the rewrite engine reads is `content_subgroup`: the subgroup
//! tags and, per source type, the ordered rename table used when a node is
//! switched to this type.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use subgroups_core_types::NodeTypeName;

use crate::errors::{Result, SubgroupsError};

/// Name of the selector property that carries the requested node type
pub const TARGET_NODE_TYPE_NAME: &str = "targetNodeTypeName";

/// One rename: the value found under `from` is written under `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationEntry {
    pub from: String,
    pub to: String,
}

impl MigrationEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered rename table for one (source type, destination type) pair
///
/// Accepts either a YAML/JSON map (`caption: headline`, document order is
/// kept) or a list of `{from, to}` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MigrationTable {
    entries: Vec<MigrationEntry>,
}

impl MigrationTable {
    pub fn new(entries: Vec<MigrationEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pairs<F, T>(pairs: impl IntoIterator<Item = (F, T)>) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(from, to)| MigrationEntry::new(from, to))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[MigrationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reject empty names and drop repeated `from` names
    ///
    /// The first occurrence of a `from` name is authoritative; later ones are
    /// dropped with a warning.
    pub fn normalize(self, node_type: &NodeTypeName, source_type: &NodeTypeName) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            if entry.from.trim().is_empty() {
                return Err(invalid_entry(node_type, source_type, "source field name is empty"));
            }
            if entry.to.trim().is_empty() {
                return Err(invalid_entry(
                    node_type,
                    source_type,
                    format!("target field name for '{}' is empty", entry.from),
                ));
            }
            if !seen.insert(entry.from.clone()) {
                tracing::warn!(
                    node_type = %node_type,
                    source_type = %source_type,
                    from = %entry.from,
                    dropped_to = %entry.to,
                    "duplicate migration source field, keeping first occurrence"
                );
                continue;
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }
}

fn invalid_entry(
    node_type: &NodeTypeName,
    source_type: &NodeTypeName,
    reason: impl Into<String>,
) -> SubgroupsError {
    SubgroupsError::InvalidMigrationEntry {
        node_type_name: node_type.to_string(),
        source_node_type_name: source_type.to_string(),
        reason: reason.into(),
    }
}

impl<'de> Deserialize<'de> for MigrationTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = MigrationTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of old field name to new field name, or a list of {from, to}")
            }

            fn visit_map<M>(self, mut map: M) -> std::result::Result<MigrationTable, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(from) = map.next_key::<String>()? {
                    let to = map.next_value::<String>()?;
                    entries.push(MigrationEntry { from, to });
                }
                Ok(MigrationTable { entries })
            }

            fn visit_seq<S>(self, mut seq: S) -> std::result::Result<MigrationTable, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(entry) = seq.next_element::<MigrationEntry>()? {
                    entries.push(entry);
                }
                Ok(MigrationTable { entries })
            }

            fn visit_unit<E>(self) -> std::result::Result<MigrationTable, E>
            where
                E: de::Error,
            {
                Ok(MigrationTable::default())
            }
        }

        deserializer.deserialize_any(TableVisitor)
    }
}

/// Declaration of a single node property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDeclaration {
    #[serde(rename = "type", default = "default_property_type")]
    pub property_type: String,

    /// Marks the selector property of a "group" type; options tagged with
    /// this value are grouped under the type's label in the picker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_tag: Option<String>,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl PropertyDeclaration {
    pub fn of_type(property_type: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            group_tag: None,
        }
    }
}

/// Presentation metadata; irrelevant to the rewrite engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeTypeUi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_message: Option<String>,
}

/// Content subgroup options of a node type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentSubgroupOptions {
    /// Subgroups this type is offered in
    #[serde(default)]
    pub tags: Vec<String>,

    /// Source type name → rename table applied when switching to this type
    #[serde(default)]
    pub property_migration_from: BTreeMap<NodeTypeName, MigrationTable>,
}

/// Immutable schema entry for one node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTypeDescriptor {
    pub name: NodeTypeName,
    pub label: String,
    pub is_abstract: bool,
    pub properties: BTreeMap<String, PropertyDeclaration>,
    pub references: BTreeSet<String>,
    pub ui: NodeTypeUi,
    pub content_subgroup: ContentSubgroupOptions,
}

impl NodeTypeDescriptor {
    pub fn new(name: impl Into<NodeTypeName>) -> Self {
        let name = name.into();
        Self {
            label: name.to_string(),
            name,
            is_abstract: false,
            properties: BTreeMap::new(),
            references: BTreeSet::new(),
            ui: NodeTypeUi::default(),
            content_subgroup: ContentSubgroupOptions::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), PropertyDeclaration::of_type("string"));
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.references.insert(name.into());
        self
    }

    /// Declare the `targetNodeTypeName` selector property
    pub fn with_type_selector(mut self) -> Self {
        self.properties
            .entry(TARGET_NODE_TYPE_NAME.to_string())
            .or_insert_with(|| PropertyDeclaration::of_type("string"));
        self
    }

    /// Declare the selector property and mark this type as the group for `tag`
    pub fn with_group_tag(mut self, tag: impl Into<String>) -> Self {
        self.properties.insert(
            TARGET_NODE_TYPE_NAME.to_string(),
            PropertyDeclaration {
                property_type: "string".to_string(),
                group_tag: Some(tag.into()),
            },
        );
        self
    }

    pub fn with_tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.content_subgroup.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_migration_from<F, T>(
        mut self,
        source: impl Into<NodeTypeName>,
        pairs: impl IntoIterator<Item = (F, T)>,
    ) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.content_subgroup
            .property_migration_from
            .insert(source.into(), MigrationTable::from_pairs(pairs));
        self
    }

    pub fn with_ui(mut self, ui: NodeTypeUi) -> Self {
        self.ui = ui;
        self
    }

    pub fn declares_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn declares_reference(&self, name: &str) -> bool {
        self.references.contains(name)
    }

    /// Whether nodes of this type carry the `targetNodeTypeName` selector
    pub fn is_type_selector(&self) -> bool {
        self.declares_property(TARGET_NODE_TYPE_NAME)
    }

    /// Tag this type groups, if it is a group type
    pub fn group_tag(&self) -> Option<&str> {
        self.properties
            .get(TARGET_NODE_TYPE_NAME)
            .and_then(|p| p.group_tag.as_deref())
            .filter(|tag| !tag.is_empty())
    }

    /// Rename table to apply when a node of `source` is switched to this type
    pub fn migration_table_from(&self, source: &NodeTypeName) -> Option<&MigrationTable> {
        self.content_subgroup
            .property_migration_from
            .get(source)
            .filter(|table| !table.is_empty())
    }

    /// Validate at schema-load time
    ///
    /// Normalizes every migration table and requires each `to` name to be
    /// declared on this type as a property or a reference.
    pub fn validate(mut self) -> Result<Self> {
        if self.name.as_str().trim().is_empty() {
            return Err(SubgroupsError::InvalidNodeType {
                node_type_name: self.name.to_string(),
                reason: "node type name is empty".to_string(),
            });
        }

        let tables = std::mem::take(&mut self.content_subgroup.property_migration_from);
        let mut normalized = BTreeMap::new();
        for (source, table) in tables {
            if source.as_str().trim().is_empty() {
                return Err(invalid_entry(&self.name, &source, "source node type name is empty"));
            }
            let table = table.normalize(&self.name, &source)?;
            for entry in table.iter() {
                if !self.declares_property(&entry.to) && !self.declares_reference(&entry.to) {
                    return Err(invalid_entry(
                        &self.name,
                        &source,
                        format!(
                            "target field '{}' is neither a declared property nor a declared reference",
                            entry.to
                        ),
                    ));
                }
            }
            normalized.insert(source, table);
        }
        self.content_subgroup.property_migration_from = normalized;

        Ok(self)
    }
}
