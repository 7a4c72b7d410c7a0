//! Caller-side score normalisation.
//!
//! Raw scores grow with graph size. Dividing by the largest observed score
//! (`by_max`) or by the largest score any vertex could have in a graph of
//! that size (`by_possible`) makes them comparable. Applying either per
//! connected component treats each component as its own graph.
//!
//! Non-finite results (a zero maximum, a one-vertex component) become `0`.

#![allow(clippy::cast_precision_loss)]

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::config::DirectionPolicy;
use crate::error::ScoringError;
use crate::graph::GraphRead;
use crate::paths::{PathScores, ScoreType, compute_subgraph_reachability, subgraph_size};

/// How to scale a score vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    #[default]
    None,
    ByMax,
    ByPossible,
}

/// Largest score `metric` can reach in a graph of `n` vertices, where one
/// is known.
#[must_use]
pub fn possible_maximum(metric: ScoreType, n: usize, symmetric: bool) -> Option<f64> {
    let n = n as f64;
    match metric {
        ScoreType::Betweenness => {
            let pairs = (n - 1.0) * (n - 2.0);
            Some(if symmetric { pairs / 2.0 } else { pairs })
        }
        ScoreType::Closeness => Some(1.0 / (n - 1.0)),
        ScoreType::HarmonicFarness => Some(n - 1.0),
        ScoreType::HarmonicCloseness => Some((n - 1.0) / n),
        ScoreType::AverageDistance
        | ScoreType::Eccentricity
        | ScoreType::Farness => None,
    }
}

fn observed_maximum(scores: &[f64]) -> f64 {
    scores.iter().copied().fold(0.0, f64::max)
}

/// Scale `scores` in place.
///
/// `n` is the vertex count the scores were computed over. Metrics with no
/// known maximum fall back from `by_possible` to `by_max`.
pub fn normalize_scores(
    scores: &mut [f64],
    metric: ScoreType,
    method: Normalization,
    n: usize,
    symmetric: bool,
) {
    let divisor = match method {
        Normalization::None => return,
        Normalization::ByMax => observed_maximum(scores),
        Normalization::ByPossible => possible_maximum(metric, n, symmetric).unwrap_or_else(|| {
            warn!(%metric, "no theoretical maximum; normalising by observed maximum");
            observed_maximum(scores)
        }),
    };
    for score in scores.iter_mut() {
        let scaled = *score / divisor;
        *score = if scaled.is_finite() { scaled } else { 0.0 };
    }
}

/// Partition the graph into connected components, ignoring edge direction.
///
/// Components are listed by their lowest position; each lists its members
/// in ascending order.
///
/// # Errors
///
/// Propagates subgraph restriction errors, which cannot occur for the full
/// vertex set.
#[instrument(skip(graph), fields(vertex_count = graph.vertex_count()))]
pub fn connected_components<G: GraphRead + ?Sized>(
    graph: &G,
) -> Result<Vec<Vec<usize>>, ScoringError> {
    let n = graph.vertex_count();
    let mut everything = FixedBitSet::with_capacity(n);
    everything.insert_range(..);
    let reach = compute_subgraph_reachability(graph, &everything, &DirectionPolicy::default())?;

    let mut assigned = FixedBitSet::with_capacity(n);
    let mut components = Vec::new();
    for (v, set) in reach.iter().enumerate() {
        if assigned.contains(v) {
            continue;
        }
        let members: Vec<usize> = set.ones().filter(|&m| !assigned.contains(m)).collect();
        for &m in &members {
            assigned.insert(m);
        }
        components.push(members);
    }
    Ok(components)
}

/// Normalise each connected component of `graph` on its own, using the
/// component's [`subgraph_size`] as `n`.
///
/// # Errors
///
/// - [`ScoringError::VertexOutOfRange`] if `result` holds a different number
///   of scores than `graph` has vertices.
/// - [`ScoringError::MissingAttribute`] if `selected_only` is set on a graph
///   without a selection attribute.
pub fn normalize_per_component<G: GraphRead + ?Sized>(
    result: &mut PathScores,
    graph: &G,
    method: Normalization,
    selected_only: bool,
    symmetric: bool,
) -> Result<(), ScoringError> {
    let n = graph.vertex_count();
    if result.scores.len() != n {
        return Err(ScoringError::VertexOutOfRange {
            position: result.scores.len().min(n),
            vertex_count: n,
        });
    }
    if method == Normalization::None {
        return Ok(());
    }
    for members in connected_components(graph)? {
        let mut member_set = FixedBitSet::with_capacity(n);
        for &m in &members {
            member_set.insert(m);
        }
        let size = subgraph_size(graph, Some(&member_set), selected_only)?;
        let mut slice: Vec<f64> = members.iter().map(|&m| result.scores[m]).collect();
        normalize_scores(&mut slice, result.metric, method, size, symmetric);
        for (&m, value) in members.iter().zip(slice) {
            result.scores[m] = value;
        }
    }
    Ok(())
}
