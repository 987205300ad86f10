//! Content fixture loader
//!
//! Validates a Content Format v0 file and builds an in-memory content
//! repository. Also reads single host commands from YAML or JSON so they can
//! be replayed against a loaded repository.

#![allow(clippy::result_large_err)]

use crate::content::format_v0::{ContentNodeV0, ContentV0, ContentVariantV0, ContentWorkspaceV0};
use crate::errors::{
    content_validation, from_domain, io_error, unsupported_schema_version, yaml_error, Result,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use subgroups_core::commands::Command;
use subgroups_core::graph::InMemoryContentRepository;
use subgroups_core::{log_op_end, log_op_error, log_op_start};
use subgroups_core_types::{DimensionSpacePoint, NodeAggregateId, WorkspaceName};

const OP: &str = "content_load";

/// Load a content fixture from a path
pub fn load_content_file(path: &Path) -> Result<InMemoryContentRepository> {
    let content = fs::read_to_string(path).map_err(|e| io_error("content_read", e))?;
    load_content_str(&content)
}

/// Load a content fixture from a string
pub fn load_content_str(content: &str) -> Result<InMemoryContentRepository> {
    log_op_start!(OP);
    let start = std::time::Instant::now();

    let (repository, node_count) = load(content).map_err(|e| {
        log_op_error!(OP, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(
        OP,
        duration_ms = start.elapsed().as_millis() as u64,
        node_count = node_count
    );
    Ok(repository)
}

fn load(content: &str) -> Result<(InMemoryContentRepository, usize)> {
    let parsed: ContentV0 =
        serde_yaml::from_str(content).map_err(|e| yaml_error("content_parse", e))?;

    if parsed.schema_version != 0 {
        return Err(unsupported_schema_version(
            "content_parse",
            parsed.schema_version,
        ));
    }

    let mut repository = InMemoryContentRepository::new();
    let mut node_count = 0;
    for (workspace, nodes) in &parsed.workspaces {
        if workspace.trim().is_empty() {
            return Err(content_validation("Workspace name must not be empty"));
        }
        validate_workspace(workspace, nodes)?;
        build_workspace(&mut repository, &WorkspaceName::new(workspace), nodes)?;
        node_count += nodes.nodes.len();
    }

    Ok((repository, node_count))
}

fn validate_workspace(workspace: &str, content: &ContentWorkspaceV0) -> Result<()> {
    let mut ids = BTreeSet::new();
    for node in &content.nodes {
        if node.id.trim().is_empty() {
            return Err(content_validation(&format!(
                "Node id must not be empty in workspace '{}'",
                workspace
            )));
        }
        if node.node_type.trim().is_empty() {
            return Err(content_validation(&format!(
                "Node '{}' has an empty type",
                node.id
            )));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(content_validation(&format!(
                "Duplicate node id '{}' in workspace '{}'",
                node.id, workspace
            )));
        }
        validate_variants(node)?;
    }

    // reference targets must exist in the same workspace
    for node in &content.nodes {
        for variant in &node.variants {
            for (name, targets) in &variant.references {
                if let Some(missing) = targets.iter().find(|t| !ids.contains(t.as_str())) {
                    return Err(content_validation(&format!(
                        "Reference '{}' of node '{}' points to unknown node '{}'",
                        name, node.id, missing
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_variants(node: &ContentNodeV0) -> Result<()> {
    if node.variants.is_empty() {
        return Err(content_validation(&format!(
            "Node '{}' must have at least one variant",
            node.id
        )));
    }

    let mut points = BTreeSet::new();
    for variant in &node.variants {
        let point = dimension_space_point(variant);
        if !points.insert(point.clone()) {
            return Err(content_validation(&format!(
                "Node '{}' declares variant {} twice",
                node.id, point
            )));
        }
    }
    Ok(())
}

fn build_workspace(
    repository: &mut InMemoryContentRepository,
    workspace: &WorkspaceName,
    content: &ContentWorkspaceV0,
) -> Result<()> {
    let graph = repository.graph_mut(workspace);

    // every node first, so references and removals can address any of them
    for node in &content.nodes {
        for variant in &node.variants {
            graph.insert_node(
                node.id.as_str(),
                node.node_type.as_str(),
                dimension_space_point(variant),
                without_nulls(&variant.properties),
            );
        }
    }

    for node in &content.nodes {
        let id = NodeAggregateId::new(&node.id);
        for variant in &node.variants {
            let point = dimension_space_point(variant);
            for (name, targets) in &variant.references {
                graph
                    .set_references(
                        &id,
                        &point,
                        name.as_str(),
                        targets.iter().map(NodeAggregateId::new).collect(),
                    )
                    .map_err(|e| from_domain(OP, e))?;
            }
            if variant.removed {
                graph
                    .mark_removed(&id, &point)
                    .map_err(|e| from_domain(OP, e))?;
            }
        }
    }
    Ok(())
}

fn dimension_space_point(variant: &ContentVariantV0) -> DimensionSpacePoint {
    DimensionSpacePoint::from_pairs(variant.dimensions.clone())
}

/// A `null` property is the same as an absent one
fn without_nulls(
    properties: &BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, serde_json::Value> {
    properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Parse a single command file
pub fn parse_command_file(path: &Path) -> Result<Command> {
    let content = fs::read_to_string(path).map_err(|e| io_error("command_read", e))?;
    parse_command_str(&content)
}

/// Parse a single command (YAML or JSON, tagged by `type`)
pub fn parse_command_str(content: &str) -> Result<Command> {
    serde_yaml::from_str(content).map_err(|e| yaml_error("command_parse", e))
}
