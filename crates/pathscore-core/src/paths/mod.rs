//! Shortest-path vertex scoring.
//!
//! # Overview
//!
//! All metrics are computed by synchronous multi-source propagation over
//! bit-vectors (see [`frontier`]). One call proceeds as:
//!
//! ```text
//! GraphRead
//!     ↓  IndexMap::filtered      (drop vertices with no neighbour but themselves)
//! compacted positions
//!     ↓  Adjacency::compile      (apply the DirectionPolicy)
//! push lists
//!     ↓  propagate + Accumulator (one callback per round)
//! compacted scores, reachability
//!     ↓  IndexMap::project_*
//! PathScores                     (full positions, ineligible vertices at 0)
//! ```
//!
//! ## Metrics
//!
//! | metric              | propagation     | score                                   |
//! |---------------------|-----------------|-----------------------------------------|
//! | `average-distance`  | all paths       | hop rounds per vertex, plus a distance list |
//! | `eccentricity`      | all paths       | rounds in which the vertex's wave advanced |
//! | `betweenness`       | shortest paths  | interior credits                         |
//! | `farness`           | shortest paths  | summed distance                          |
//! | `closeness`         | shortest paths  | `1 / farness`                            |
//! | `harmonic-farness`  | shortest paths  | summed reciprocal distance               |
//! | `harmonic-closeness`| shortest paths  | harmonic farness / vertex count          |

pub mod accumulate;
pub mod direction;
pub mod frontier;
pub mod orchestrate;
pub mod projection;
pub mod subgraph;

pub use subgraph::{compute_subgraph_reachability, subgraph_size};

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::DirectionPolicy;
use crate::error::ScoringError;
use crate::graph::GraphRead;

use accumulate::Accumulator;
use direction::Adjacency;
use orchestrate::{Walk, propagate};
use projection::IndexMap;

// ---------------------------------------------------------------------------
// ScoreType
// ---------------------------------------------------------------------------

/// The vertex metric to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreType {
    AverageDistance,
    Eccentricity,
    Betweenness,
    Closeness,
    Farness,
    HarmonicCloseness,
    HarmonicFarness,
}

impl ScoreType {
    pub const ALL: [Self; 7] = [
        Self::AverageDistance,
        Self::Eccentricity,
        Self::Betweenness,
        Self::Closeness,
        Self::Farness,
        Self::HarmonicCloseness,
        Self::HarmonicFarness,
    ];

    /// Whether the metric scores confirmed shortest-path pairs rather than
    /// plain hop rounds.
    #[must_use]
    pub const fn requires_shortest_paths(self) -> bool {
        !matches!(self, Self::AverageDistance | Self::Eccentricity)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AverageDistance => "average-distance",
            Self::Eccentricity => "eccentricity",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::Farness => "farness",
            Self::HarmonicCloseness => "harmonic-closeness",
            Self::HarmonicFarness => "harmonic-farness",
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ScoringError::UnknownScoreType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PathScores
// ---------------------------------------------------------------------------

/// Output of one scoring call, in full vertex positions.
#[derive(Debug, Clone)]
pub struct PathScores {
    pub metric: ScoreType,
    /// One score per vertex.
    pub scores: Vec<f64>,
    /// Per vertex, the sources known to reach it. Directed shortest-path
    /// runs also include what it reaches; symmetric runs hold the whole
    /// component. Empty for vertices with no neighbour other than themselves.
    pub reachability: Vec<FixedBitSet>,
    /// Average distance only: the round index of every newly reached
    /// (vertex, source) pair. Empty for other metrics.
    pub distances: Vec<u32>,
    /// Propagation rounds until convergence.
    pub rounds: u32,
}

impl PathScores {
    /// Mean of [`Self::distances`], or `None` when nothing was reached.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_distance(&self) -> Option<f64> {
        if self.distances.is_empty() {
            return None;
        }
        let total: u64 = self.distances.iter().map(|&d| u64::from(d)).sum();
        Some(total as f64 / self.distances.len() as f64)
    }

    /// Number of vertices in `v`'s reachability set.
    #[must_use]
    pub fn reach_count(&self, v: usize) -> usize {
        self.reachability.get(v).map_or(0, |s| s.count_ones(..))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compute `metric` for every vertex of `graph`.
///
/// With `selected_only`, only pairs with selected endpoints contribute: both
/// ends for betweenness, the far end for farness and harmonic metrics.
///
/// # Errors
///
/// - [`ScoringError::MissingAttribute`] if `selected_only` is set and the
///   graph has no selection attribute. Raised before any propagation.
/// - [`ScoringError::UnsupportedMetric`] on an internal dispatch fault.
#[instrument(skip(graph, policy), fields(vertex_count = graph.vertex_count()))]
pub fn compute_scores<G: GraphRead + ?Sized>(
    graph: &G,
    metric: ScoreType,
    policy: &DirectionPolicy,
    selected_only: bool,
) -> Result<PathScores, ScoringError> {
    run_scores(graph, metric, policy, selected_only, None)
}

/// Like [`compute_scores`], checking `cancel` between rounds.
///
/// # Errors
///
/// As [`compute_scores`], plus [`ScoringError::Cancelled`] once `cancel` is
/// observed set.
#[instrument(skip(graph, policy, cancel), fields(vertex_count = graph.vertex_count()))]
pub fn compute_scores_cancellable<G: GraphRead + ?Sized>(
    graph: &G,
    metric: ScoreType,
    policy: &DirectionPolicy,
    selected_only: bool,
    cancel: &AtomicBool,
) -> Result<PathScores, ScoringError> {
    run_scores(graph, metric, policy, selected_only, Some(cancel))
}

fn run_scores<G: GraphRead + ?Sized>(
    graph: &G,
    metric: ScoreType,
    policy: &DirectionPolicy,
    selected_only: bool,
    cancel: Option<&AtomicBool>,
) -> Result<PathScores, ScoringError> {
    if selected_only && !graph.has_selection() {
        return Err(ScoringError::MissingAttribute);
    }

    let vertex_count = graph.vertex_count();
    let index = IndexMap::filtered(vertex_count, |p| {
        graph.neighbours(p).into_iter().any(|q| q != p)
    });
    let adjacency = Adjacency::compile(graph, &index, policy);
    let shortest = metric.requires_shortest_paths();
    let walk = Walk::select(&adjacency, shortest);

    debug!(
        %metric,
        eligible = index.len(),
        ?walk,
        "scoring"
    );

    let mut accumulator = if shortest {
        let selection = selected_only.then(|| compact_selection(graph, &index));
        Accumulator::shortest_paths(metric, index.len(), selection)?
    } else {
        Accumulator::all_paths(metric, index.len())?
    };

    let outcome = propagate(&adjacency, walk, &mut accumulator, cancel)?;
    let (compact_scores, distances) = accumulator.finish(metric, vertex_count);

    Ok(PathScores {
        metric,
        scores: index.project_scores(&compact_scores),
        reachability: index.project_sets(&outcome.reachability),
        distances,
        rounds: outcome.rounds,
    })
}

fn compact_selection<G: GraphRead + ?Sized>(graph: &G, index: &IndexMap) -> FixedBitSet {
    let mut mask = FixedBitSet::with_capacity(index.len());
    for (compact, &full) in index.members().iter().enumerate() {
        if graph.is_selected(full) {
            mask.insert(compact);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeDirection, SnaGraph};

    #[test]
    fn shortest_path_classification() {
        assert!(!ScoreType::AverageDistance.requires_shortest_paths());
        assert!(!ScoreType::Eccentricity.requires_shortest_paths());
        for metric in [
            ScoreType::Betweenness,
            ScoreType::Closeness,
            ScoreType::Farness,
            ScoreType::HarmonicCloseness,
            ScoreType::HarmonicFarness,
        ] {
            assert!(metric.requires_shortest_paths(), "{metric}");
        }
    }

    #[test]
    fn parse_accepts_kebab_and_snake_case() {
        assert_eq!(
            "harmonic-closeness".parse::<ScoreType>().expect("kebab"),
            ScoreType::HarmonicCloseness
        );
        assert_eq!(
            "AVERAGE_DISTANCE".parse::<ScoreType>().expect("snake"),
            ScoreType::AverageDistance
        );
        for metric in ScoreType::ALL {
            assert_eq!(metric.to_string().parse::<ScoreType>().expect("display"), metric);
        }
        let err = "pagerank".parse::<ScoreType>().unwrap_err();
        assert!(matches!(err, ScoringError::UnknownScoreType(ref s) if s == "pagerank"));
    }

    #[test]
    fn selected_only_without_attribute_fails_before_propagation() {
        let mut g = SnaGraph::with_vertices(2);
        g.add_edge(0, 1, EdgeDirection::Undirected);
        for metric in ScoreType::ALL {
            let err = compute_scores(&g, metric, &DirectionPolicy::default(), true).unwrap_err();
            assert!(matches!(err, ScoringError::MissingAttribute), "{metric}: {err}");
        }
    }

    #[test]
    fn raised_cancel_flag_aborts() {
        let mut g = SnaGraph::with_vertices(2);
        g.add_edge(0, 1, EdgeDirection::Undirected);
        let flag = AtomicBool::new(true);
        let err = compute_scores_cancellable(
            &g,
            ScoreType::Betweenness,
            &DirectionPolicy::default(),
            false,
            &flag,
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::Cancelled { .. }));
    }

    #[test]
    fn mean_distance_of_empty_list_is_none() {
        let g = SnaGraph::with_vertices(3);
        let result =
            compute_scores(&g, ScoreType::AverageDistance, &DirectionPolicy::default(), false)
                .expect("scores");
        assert_eq!(result.mean_distance(), None);
        assert_eq!(result.rounds, 0);
        assert_eq!(result.reach_count(0), 0);
    }

    #[test]
    fn self_loop_only_vertex_is_isolated() {
        let mut g = SnaGraph::with_vertices(2);
        g.add_edge(0, 0, EdgeDirection::Directed);
        let result = compute_scores(&g, ScoreType::Farness, &DirectionPolicy::default(), false)
            .expect("scores");
        assert_eq!(result.rounds, 0);
        assert_eq!(result.reach_count(0), 0);
        assert!(result.scores.iter().all(|s| s.abs() < 1e-12));
    }
}
