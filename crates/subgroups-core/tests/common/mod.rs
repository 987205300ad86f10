#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use subgroups_core::command_hook::HostDependencies;
use subgroups_core::commands::Command;
use subgroups_core::model::{NodeTypeDescriptor, PropertyValues};
use subgroups_core::{InMemoryContentRepository, InMemoryNodeTypeRegistry, TARGET_NODE_TYPE_NAME};
use subgroups_core_types::{DimensionSpacePoint, WorkspaceName};

pub const TEXT: &str = "Vendor:Text";
pub const HEADLINE: &str = "Vendor:Headline";
pub const TEASER: &str = "Vendor:Teaser";

pub fn live() -> WorkspaceName {
    "live".into()
}

/// Single-dimension point `language=<code>`
pub fn lang(code: &str) -> DimensionSpacePoint {
    DimensionSpacePoint::from_pairs([("language", code)])
}

pub fn props(pairs: &[(&str, &str)]) -> PropertyValues {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect()
}

/// Text → Headline renames `caption` → `headline` and `related` → `links`;
/// Text → Teaser has no table
pub fn registry() -> InMemoryNodeTypeRegistry {
    InMemoryNodeTypeRegistry::from_descriptors([
        NodeTypeDescriptor::new(TEXT)
            .with_type_selector()
            .with_property("caption")
            .with_reference("related")
            .with_migration_from(HEADLINE, [("headline", "caption"), ("links", "related")]),
        NodeTypeDescriptor::new(HEADLINE)
            .with_type_selector()
            .with_property("headline")
            .with_reference("links")
            .with_migration_from(TEXT, [("caption", "headline"), ("related", "links")]),
        NodeTypeDescriptor::new(TEASER)
            .with_type_selector()
            .with_property("teaser"),
        NodeTypeDescriptor::new("Vendor:Page"),
    ])
    .expect("fixture registry is valid")
}

/// Text node `n1` in en and de; `caption` only in en
pub fn content() -> InMemoryContentRepository {
    let mut content = InMemoryContentRepository::new();
    content
        .graph_mut(&live())
        .insert_node("n1", TEXT, lang("en"), props(&[("caption", "Hello")]))
        .insert_node("n1", TEXT, lang("de"), PropertyValues::new())
        .insert_node("a", "Vendor:Page", lang("en"), PropertyValues::new())
        .insert_node("b", "Vendor:Page", lang("en"), PropertyValues::new())
        .insert_node("a", "Vendor:Page", lang("de"), PropertyValues::new());
    content
}

pub fn dependencies(content: InMemoryContentRepository) -> HostDependencies {
    HostDependencies::new(Arc::new(registry()), Arc::new(content))
}

/// The write the type picker issues
pub fn pick_type(dsp: DimensionSpacePoint, node_type: &str) -> Command {
    Command::set_property(live(), "n1".into(), dsp, TARGET_NODE_TYPE_NAME, json!(node_type))
}
