//! Target node types data source for the grouped type picker
//!
//! Presentation only: joins the candidate types (those with content subgroup
//! tags) against the group types (those whose selector property carries a
//! group tag) and returns one select option per (candidate, tag).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command_hook::HostDependencies;
use crate::errors::Result;
use crate::model::{NodeSnapshot, NodeTypeDescriptor};
use crate::node_types::NodeTypeRegistry;

/// One entry of the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub group: Option<String>,
}

/// Arguments the picker passes along with the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceArguments {
    /// Restrict candidates to this subgroup tag
    #[serde(default)]
    pub content_subgroup: Option<String>,
}

impl DataSourceArguments {
    pub fn for_subgroup(tag: impl Into<String>) -> Self {
        Self {
            content_subgroup: Some(tag.into()),
        }
    }
}

pub trait DataSource: Send + Sync {
    fn identifier(&self) -> &str;

    /// # Errors
    ///
    /// Implementations fail only on host lookups; an absent context node is
    /// not an error.
    fn get_data(
        &self,
        node: Option<&NodeSnapshot>,
        arguments: &DataSourceArguments,
    ) -> Result<Vec<SelectOption>>;
}

pub trait DataSourceFactory: Send + Sync {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn DataSource>;
}

/// Label translation; `None` means "no translation available"
pub trait Translator: Send + Sync {
    fn translate(&self, id: &str) -> Option<String>;
}

/// Returns every id unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, id: &str) -> Option<String> {
        Some(id.to_string())
    }
}

/// Fixed translation table
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    translations: BTreeMap<String, String>,
}

impl MapTranslator {
    pub fn new(translations: BTreeMap<String, String>) -> Self {
        Self { translations }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, id: &str) -> Option<String> {
        self.translations.get(id).cloned()
    }
}

/// Maps configured icon names to the names the picker renders
pub trait IconNameMapper: Send + Sync {
    fn convert(&self, icon: &str) -> String;
}

/// Drops the legacy `icon-` prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIconNameMapper;

impl IconNameMapper for DefaultIconNameMapper {
    fn convert(&self, icon: &str) -> String {
        icon.strip_prefix("icon-").unwrap_or(icon).to_string()
    }
}

pub struct TargetNodeTypesDataSource {
    node_types: Arc<dyn NodeTypeRegistry>,
    translator: Box<dyn Translator>,
    icon_mapper: Box<dyn IconNameMapper>,
}

impl TargetNodeTypesDataSource {
    pub const IDENTIFIER: &'static str = "contentsubgroups-target-nodetypes";

    pub fn new(node_types: Arc<dyn NodeTypeRegistry>) -> Self {
        Self {
            node_types,
            translator: Box::new(IdentityTranslator),
            icon_mapper: Box::new(DefaultIconNameMapper),
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_icon_mapper(mut self, icon_mapper: Box<dyn IconNameMapper>) -> Self {
        self.icon_mapper = icon_mapper;
        self
    }

    fn translated(&self, id: &str) -> String {
        self.translator
            .translate(id)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| id.to_string())
    }

    /// Group label per tag; a later group type wins on a shared tag
    fn group_labels(&self, node_types: &[&NodeTypeDescriptor]) -> BTreeMap<String, String> {
        node_types
            .iter()
            .filter_map(|t| t.group_tag().map(|tag| (tag.to_string(), self.translated(&t.label))))
            .collect()
    }
}

/// Position ascending, unpositioned last, ties by name
fn by_position(a: &&NodeTypeDescriptor, b: &&NodeTypeDescriptor) -> std::cmp::Ordering {
    match (a.ui.position, b.ui.position) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| a.name.cmp(&b.name))
}

impl DataSource for TargetNodeTypesDataSource {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn get_data(
        &self,
        node: Option<&NodeSnapshot>,
        arguments: &DataSourceArguments,
    ) -> Result<Vec<SelectOption>> {
        if node.is_none() {
            return Ok(Vec::new());
        }

        let node_types: Vec<&NodeTypeDescriptor> = self
            .node_types
            .node_types()
            .into_iter()
            .filter(|t| !t.is_abstract)
            .collect();
        let groups = self.group_labels(&node_types);

        let base_tag = arguments
            .content_subgroup
            .as_deref()
            .filter(|tag| !tag.is_empty());
        let mut candidates: Vec<&NodeTypeDescriptor> = node_types
            .into_iter()
            .filter(|t| !t.content_subgroup.tags.is_empty())
            .filter(|t| {
                base_tag.map_or(true, |tag| t.content_subgroup.tags.iter().any(|own| own == tag))
            })
            .collect();
        candidates.sort_by(by_position);

        let options = candidates
            .into_iter()
            .flat_map(|candidate| {
                let icon = candidate
                    .ui
                    .icon
                    .as_deref()
                    .map(|icon| self.icon_mapper.convert(icon));
                let description = candidate
                    .ui
                    .help_message
                    .as_deref()
                    .map(|message| self.translated(message));
                let groups = &groups;
                candidate
                    .content_subgroup
                    .tags
                    .iter()
                    .map(move |tag| SelectOption {
                        label: candidate.label.clone(),
                        value: candidate.name.to_string(),
                        icon: icon.clone(),
                        description: description.clone(),
                        group: groups.get(tag).cloned(),
                    })
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            base_tag = base_tag.unwrap_or(""),
            options = options.len(),
            "target node type options built"
        );
        Ok(options)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TargetNodeTypesDataSourceFactory;

impl DataSourceFactory for TargetNodeTypesDataSourceFactory {
    fn build(&self, dependencies: &HostDependencies) -> Box<dyn DataSource> {
        Box::new(TargetNodeTypesDataSource::new(Arc::clone(
            &dependencies.node_types,
        )))
    }
}
