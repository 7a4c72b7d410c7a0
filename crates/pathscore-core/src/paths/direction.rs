//! Neighbour direction filtering and adjacency compilation.
//!
//! A step from `u` to `v` is allowed when at least one edge joining them
//! counts as outgoing from `u` under the [`DirectionPolicy`]. The result is
//! compiled once per call into flat index lists over the compacted vertex
//! space, one list per propagation direction.

use tracing::trace;

use crate::config::DirectionPolicy;
use crate::graph::{EdgeView, GraphRead};

use super::projection::IndexMap;

/// Whether `edge` can be crossed starting from `vertex`.
///
/// True for an undirected edge when undirected edges are bidirectional, for
/// an edge whose source is `vertex` when outgoing edges count, and for an
/// edge whose destination is `vertex` when incoming edges count.
#[must_use]
pub const fn counts_as_outgoing(edge: &EdgeView, vertex: usize, policy: &DirectionPolicy) -> bool {
    (edge.is_undirected() && policy.treat_undirected_bidirectional)
        || (policy.include_outgoing && edge.source == vertex)
        || (policy.include_incoming && edge.destination == vertex)
}

/// Whether `edge` can be crossed arriving at `vertex`.
#[must_use]
pub const fn counts_as_incoming(edge: &EdgeView, vertex: usize, policy: &DirectionPolicy) -> bool {
    (edge.is_undirected() && policy.treat_undirected_bidirectional)
        || (policy.include_incoming && edge.source == vertex)
        || (policy.include_outgoing && edge.destination == vertex)
}

/// Whether any of the edges joining `from` and `to` allows the step.
fn can_step<G: GraphRead + ?Sized>(
    graph: &G,
    from: usize,
    to: usize,
    policy: &DirectionPolicy,
) -> bool {
    graph
        .link_edges(from, to)
        .iter()
        .any(|e| counts_as_outgoing(e, from, policy))
}

/// Push lists for one propagation, indexed by compacted position.
///
/// `forward[v]` lists the vertices `v` forwards its known sources to so that
/// `traversal[x]` collects what `x` can reach. `backward[v]` does the
/// reverse, collecting what reaches `x`. Symmetric adjacency stores one list.
#[derive(Debug, Clone)]
pub struct Adjacency {
    forward: Vec<Vec<usize>>,
    backward: Option<Vec<Vec<usize>>>,
}

impl Adjacency {
    /// Compile the adjacency of the vertices in `index`, ignoring edges to
    /// vertices outside it and self-loops.
    pub fn compile<G: GraphRead + ?Sized>(
        graph: &G,
        index: &IndexMap,
        policy: &DirectionPolicy,
    ) -> Self {
        let n = index.len();
        let mut forward = vec![Vec::new(); n];
        let mut backward = if policy.is_symmetric() {
            None
        } else {
            Some(vec![Vec::new(); n])
        };

        for (compact, &full) in index.members().iter().enumerate() {
            for neighbour in graph.neighbours(full) {
                if neighbour == full {
                    continue;
                }
                let Some(other) = index.compact(neighbour) else {
                    continue;
                };
                match backward.as_mut() {
                    None => forward[compact].push(other),
                    Some(back) => {
                        if can_step(graph, neighbour, full, policy) {
                            forward[compact].push(other);
                        }
                        if can_step(graph, full, neighbour, policy) {
                            back[compact].push(other);
                        }
                    }
                }
            }
        }

        trace!(
            vertices = n,
            links = forward.iter().map(Vec::len).sum::<usize>(),
            symmetric = backward.is_none(),
            "compiled adjacency"
        );
        Self { forward, backward }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    #[must_use]
    pub fn forward(&self) -> &[Vec<usize>] {
        &self.forward
    }

    /// Reverse push lists. Same as [`Self::forward`] when symmetric.
    #[must_use]
    pub fn backward(&self) -> &[Vec<usize>] {
        self.backward.as_deref().unwrap_or(&self.forward)
    }

    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.backward.is_none()
    }
}
