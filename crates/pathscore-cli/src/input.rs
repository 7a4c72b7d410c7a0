//! Loading graph documents and scoring configs from disk.

use std::fs;
use std::path::Path;

use anyhow::Context;
use fixedbitset::FixedBitSet;
use pathscore_core::config::ScoringConfig;
use pathscore_core::graph::{GraphDocument, GraphRead, SnaGraph};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error, scoring_failure};

/// Read a JSON [`GraphDocument`] and build the graph.
pub fn load_graph(path: &Path) -> anyhow::Result<SnaGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read graph file {}", path.display()))?;
    let doc: GraphDocument = serde_json::from_str(&text)
        .with_context(|| format!("parse graph document {}", path.display()))?;
    let graph = SnaGraph::from_document(&doc);
    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        path = %path.display(),
        "loaded graph"
    );
    Ok(graph)
}

/// Read a TOML [`ScoringConfig`], or the defaults when no path is given.
pub fn load_config(path: Option<&Path>, output: OutputMode) -> anyhow::Result<ScoringConfig> {
    let Some(path) = path else {
        return Ok(ScoringConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    ScoringConfig::from_toml_str(&text).map_err(|err| scoring_failure(output, err))
}

/// Resolve vertex labels to a position set, rejecting unknown labels.
pub fn resolve_members(
    graph: &SnaGraph,
    labels: &[String],
    output: OutputMode,
) -> anyhow::Result<FixedBitSet> {
    let mut members = FixedBitSet::with_capacity(graph.vertex_count());
    for label in labels {
        let Some(position) = graph.position(label) else {
            render_error(
                output,
                &CliError::with_details(
                    format!("unknown vertex '{label}'"),
                    "list only vertex ids present in the graph document",
                    "unknown_vertex",
                ),
            )?;
            anyhow::bail!("unknown vertex '{label}'");
        };
        members.insert(position);
    }
    Ok(members)
}
