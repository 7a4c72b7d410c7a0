//! Reachability and size restricted to a vertex subset.
//!
//! Only the subset is seeded and only edges between members are followed.
//! No scores are produced; callers use the reachability sets to find the
//! components of the subset.

use fixedbitset::FixedBitSet;
use tracing::instrument;

use crate::config::DirectionPolicy;
use crate::error::ScoringError;
use crate::graph::GraphRead;

use super::direction::Adjacency;
use super::orchestrate::{Walk, propagate};
use super::projection::IndexMap;

fn check_range(subset: &FixedBitSet, vertex_count: usize) -> Result<(), ScoringError> {
    match subset.ones().find(|&p| p >= vertex_count) {
        Some(position) => Err(ScoringError::VertexOutOfRange {
            position,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// For each member of `subset`, the members it is connected with inside the
/// subset. Isolated members reach only themselves; non-members get an empty
/// set.
///
/// A symmetric policy connects in both directions. Otherwise each set holds
/// the members that reach that vertex.
///
/// # Errors
///
/// Returns [`ScoringError::VertexOutOfRange`] if `subset` names a position
/// outside the graph.
#[instrument(skip(graph, subset, policy), fields(vertex_count = graph.vertex_count(), members = subset.count_ones(..)))]
pub fn compute_subgraph_reachability<G: GraphRead + ?Sized>(
    graph: &G,
    subset: &FixedBitSet,
    policy: &DirectionPolicy,
) -> Result<Vec<FixedBitSet>, ScoringError> {
    let vertex_count = graph.vertex_count();
    check_range(subset, vertex_count)?;

    let index = IndexMap::from_members(vertex_count, subset.ones().collect());
    let adjacency = Adjacency::compile(graph, &index, policy);
    let outcome = propagate(&adjacency, Walk::select(&adjacency, false), &mut (), None)?;
    Ok(index.project_sets(&outcome.reachability))
}

/// Count the vertices of `subset` (or of the whole graph), only counting
/// selected ones when `selected_only` is set.
///
/// # Errors
///
/// - [`ScoringError::MissingAttribute`] if `selected_only` is set and the
///   graph has no selection attribute.
/// - [`ScoringError::VertexOutOfRange`] if `subset` names a position outside
///   the graph.
pub fn subgraph_size<G: GraphRead + ?Sized>(
    graph: &G,
    subset: Option<&FixedBitSet>,
    selected_only: bool,
) -> Result<usize, ScoringError> {
    if selected_only && !graph.has_selection() {
        return Err(ScoringError::MissingAttribute);
    }
    let vertex_count = graph.vertex_count();
    let counted = |p: usize| !selected_only || graph.is_selected(p);
    match subset {
        Some(members) => {
            check_range(members, vertex_count)?;
            Ok(members.ones().filter(|&p| counted(p)).count())
        }
        None => Ok((0..vertex_count).filter(|&p| counted(p)).count()),
    }
}
