//! Graph construction from labelled vertex and edge records.
//!
//! # Overview
//!
//! [`SnaGraph`] stores vertices as labelled petgraph nodes and edges as
//! petgraph edges weighted by [`EdgeDirection`]. Undirected edges are stored
//! once, in the orientation they were given; [`GraphRead::link_edges`]
//! reports both orientations so the traversal filter can decide.
//!
//! ## Input format
//!
//! ```json
//! {
//!   "vertices": [{"id": "A", "selected": true}, {"id": "B"}],
//!   "edges": [{"source": "A", "target": "B", "directed": false}]
//! }
//! ```
//!
//! Edges that name an unknown vertex add it. The selection attribute exists
//! as soon as any vertex record carries `selected`; unmarked vertices are
//! then unselected. Parallel edges and self-loops are kept.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{EdgeDirection, EdgeView, GraphRead};

// ---------------------------------------------------------------------------
// Serialised form
// ---------------------------------------------------------------------------

/// A vertex entry in a [`GraphDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

/// An edge entry in a [`GraphDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

/// Serialisable vertex/edge listing that [`SnaGraph`] is built from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

const fn default_directed() -> bool {
    true
}

// ---------------------------------------------------------------------------
// SnaGraph
// ---------------------------------------------------------------------------

/// A labelled multigraph with mixed edge orientation.
///
/// Vertex positions are the petgraph node indices, assigned in insertion
/// order and never reused (vertices cannot be removed).
#[derive(Debug, Clone, Default)]
pub struct SnaGraph {
    /// Nodes carry labels, edges carry their orientation.
    pub graph: DiGraph<String, EdgeDirection>,
    /// Mapping from label to node index.
    pub node_map: HashMap<String, NodeIndex>,
    selection: Option<FixedBitSet>,
}

impl SnaGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph of `n` vertices labelled `"0"`, `"1"`, ... and no edges.
    #[must_use]
    pub fn with_vertices(n: usize) -> Self {
        let mut g = Self::new();
        for i in 0..n {
            g.add_vertex(i.to_string());
        }
        g
    }

    /// Build a graph from its serialised form.
    #[must_use]
    #[instrument(skip(doc), fields(vertices = doc.vertices.len(), edges = doc.edges.len()))]
    pub fn from_document(doc: &GraphDocument) -> Self {
        let mut g = Self::new();
        for record in &doc.vertices {
            let pos = g.add_vertex(record.id.clone());
            if let Some(selected) = record.selected {
                g.set_selected(pos, selected);
            }
        }
        for edge in &doc.edges {
            let direction = if edge.directed {
                EdgeDirection::Directed
            } else {
                EdgeDirection::Undirected
            };
            g.add_labelled_edge(&edge.source, &edge.target, direction);
        }
        g
    }

    /// Serialise back to a [`GraphDocument`], vertices in position order.
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        let vertices = self
            .graph
            .node_indices()
            .map(|idx| VertexRecord {
                id: self.graph[idx].clone(),
                selected: self.selection.as_ref().map(|s| s.contains(idx.index())),
            })
            .collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| EdgeRecord {
                source: self.graph[e.source()].clone(),
                target: self.graph[e.target()].clone(),
                directed: *e.weight() == EdgeDirection::Directed,
            })
            .collect();
        GraphDocument { vertices, edges }
    }

    /// Add a vertex, or return the position of the existing one with that
    /// label.
    pub fn add_vertex(&mut self, label: impl Into<String>) -> usize {
        let label = label.into();
        if let Some(idx) = self.node_map.get(&label) {
            return idx.index();
        }
        let idx = self.graph.add_node(label.clone());
        self.node_map.insert(label, idx);
        if let Some(selection) = self.selection.as_mut() {
            selection.grow(self.graph.node_count());
        }
        idx.index()
    }

    /// Add an edge between two labels, creating missing endpoints.
    pub fn add_labelled_edge(&mut self, source: &str, target: &str, direction: EdgeDirection) {
        let s = self.add_vertex(source);
        let t = self.add_vertex(target);
        self.add_edge(s, t, direction);
    }

    /// Add an edge between two existing positions.
    ///
    /// # Panics
    ///
    /// Panics if either position is not a vertex of this graph.
    pub fn add_edge(&mut self, source: usize, target: usize, direction: EdgeDirection) {
        self.graph
            .add_edge(NodeIndex::new(source), NodeIndex::new(target), direction);
    }

    /// Mark or unmark a vertex, creating the selection attribute on first
    /// use.
    pub fn set_selected(&mut self, position: usize, selected: bool) {
        let n = self.graph.node_count();
        let selection = self
            .selection
            .get_or_insert_with(|| FixedBitSet::with_capacity(n));
        selection.grow(n);
        if position < n {
            selection.set(position, selected);
        }
    }

    /// Drop the selection attribute entirely.
    pub fn clear_selection_attribute(&mut self) {
        self.selection = None;
    }

    /// Return the number of edges, counting parallels separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the position of a label.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.node_map.get(label).map(|idx| idx.index())
    }

    /// Return the label of a position.
    #[must_use]
    pub fn label(&self, position: usize) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(position))
            .map(String::as_str)
    }
}

impl GraphRead for SnaGraph {
    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn neighbours(&self, position: usize) -> Vec<usize> {
        if position >= self.graph.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors_undirected(NodeIndex::new(position))
            .map(NodeIndex::index)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn link_edges(&self, a: usize, b: usize) -> Vec<EdgeView> {
        let n = self.graph.node_count();
        if a >= n || b >= n {
            return Vec::new();
        }
        let a_idx = NodeIndex::new(a);
        let b_idx = NodeIndex::new(b);
        let view = |e: petgraph::graph::EdgeReference<'_, EdgeDirection>| EdgeView {
            source: e.source().index(),
            destination: e.target().index(),
            direction: *e.weight(),
        };

        let mut out: Vec<EdgeView> = self
            .graph
            .edges_directed(a_idx, Direction::Outgoing)
            .filter(|e| e.target() == b_idx)
            .map(view)
            .collect();
        if a != b {
            out.extend(
                self.graph
                    .edges_directed(a_idx, Direction::Incoming)
                    .filter(|e| e.source() == b_idx)
                    .map(view),
            );
        }
        out
    }

    fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    fn is_selected(&self, position: usize) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| position < s.len() && s.contains(position))
    }
}
