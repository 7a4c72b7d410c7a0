//! Read-only graph access for the scoring engine.
//!
//! # Overview
//!
//! The engine never owns graph storage. It reads vertices, adjacency and
//! edge orientation through [`GraphRead`], addressing vertices by dense
//! positions `0..vertex_count()` that stay stable for one call.
//!
//! [`SnaGraph`] is the bundled implementation: a petgraph `DiGraph` with a
//! label map and an optional selection attribute, loadable from a
//! [`GraphDocument`].

pub mod build;

pub use build::{EdgeRecord, GraphDocument, SnaGraph, VertexRecord};

use serde::{Deserialize, Serialize};

/// Whether an edge carries an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Directed,
    Undirected,
}

/// One edge between two vertex positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView {
    pub source: usize,
    pub destination: usize,
    pub direction: EdgeDirection,
}

impl EdgeView {
    #[must_use]
    pub const fn is_undirected(&self) -> bool {
        matches!(self.direction, EdgeDirection::Undirected)
    }
}

/// Storage contract consumed by the scoring entry points.
pub trait GraphRead {
    /// Number of vertices; positions run `0..vertex_count()`.
    fn vertex_count(&self) -> usize;

    /// Distinct positions sharing at least one edge with `position`, in
    /// either orientation. A self-loop lists the vertex itself.
    fn neighbours(&self, position: usize) -> Vec<usize>;

    /// Every edge joining `a` and `b`, whichever end is the source.
    fn link_edges(&self, a: usize, b: usize) -> Vec<EdgeView>;

    /// Whether the graph carries a selection attribute at all.
    fn has_selection(&self) -> bool;

    /// Whether `position` is selected. False when there is no attribute.
    fn is_selected(&self, position: usize) -> bool;
}
