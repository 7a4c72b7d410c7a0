//! Per-round score accumulation.
//!
//! # Overview
//!
//! After every delivery step the orchestrator hands a [`RoundView`] to the
//! active [`RoundAccumulator`]. For the shortest-path metrics, vertices
//! marked in `turn` received new sources this round and each newly confirmed
//! pair `(v, w)` at distance `d` is scored from its *interior*: the vertices
//! known to both ends that are neither on the fresh frontier of either end
//! nor a dead end for both.
//!
//! | metric                 | per confirmed pair                    |
//! |------------------------|---------------------------------------|
//! | betweenness            | `+1` on every interior vertex         |
//! | farness / closeness    | `+ (interior + 1)` on `v`             |
//! | harmonic               | `+ 1 / (interior + 1)` on `v` (and `w` when symmetric) |
//!
//! Eccentricity and average distance need no pairs. Their `turn` marks the
//! sources whose wave reached a new vertex this round, so a vertex's hop
//! count is its eccentricity. Average distance also records the round once
//! per newly reached (vertex, source) pair.

#![allow(clippy::cast_precision_loss)]

use fixedbitset::FixedBitSet;

use crate::error::{PropagationClass, ScoringError};

use super::ScoreType;
use super::frontier::Frontier;

// ---------------------------------------------------------------------------
// RoundView
// ---------------------------------------------------------------------------

/// Read-only snapshot of the propagation state after a round's deliveries.
///
/// In symmetric mode `forward` and `backward` are the same instance.
#[derive(Debug, Clone, Copy)]
pub struct RoundView<'a> {
    /// 1-based round index; equals the distance of pairs confirmed now.
    pub round: u32,
    pub forward: &'a Frontier,
    pub backward: &'a Frontier,
    /// Receivers of new sources for pair walks, advancing sources otherwise.
    pub turn: &'a FixedBitSet,
    pub symmetric: bool,
}

impl RoundView<'_> {
    /// Vertices `w` newly reached from `v` this round. In directed mode the
    /// backward walk must have confirmed the same pair from `w`'s side.
    pub fn confirmed(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        let fresh = self.forward.send_buffer(v);
        let known = self.forward.traversal(v);
        fresh
            .ones()
            .filter(move |&w| !known.contains(w))
            .filter(move |&w| self.symmetric || self.backward.send_buffer(w).contains(v))
    }

    /// Interior vertices of the confirmed pair `(v, w)`.
    #[must_use]
    pub fn interior(&self, v: usize, w: usize) -> FixedBitSet {
        let mut inside = self.backward.traversal(w).clone();
        inside.intersect_with(self.forward.traversal(v));
        inside.difference_with(self.forward.send_buffer(v));
        inside.difference_with(self.backward.send_buffer(w));
        if let (Some(dead_v), Some(dead_w)) =
            (self.backward.exclusions(v), self.forward.exclusions(w))
        {
            let mut both = dead_v.clone();
            both.intersect_with(dead_w);
            inside.difference_with(&both);
        }
        inside
    }
}

/// Receives one callback per propagation round.
pub trait RoundAccumulator {
    fn on_round_advance(&mut self, view: &RoundView<'_>);
}

/// Reachability-only runs score nothing.
impl RoundAccumulator for () {
    fn on_round_advance(&mut self, _view: &RoundView<'_>) {}
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Scores plus the optional selection mask, in compacted positions.
#[derive(Debug, Clone)]
pub struct PairTally {
    scores: Vec<f64>,
    selection: Option<FixedBitSet>,
}

impl PairTally {
    fn new(n: usize, selection: Option<FixedBitSet>) -> Self {
        Self {
            scores: vec![0.0; n],
            selection,
        }
    }
}

fn selected(selection: Option<&FixedBitSet>, v: usize) -> bool {
    selection.is_none_or(|s| s.contains(v))
}

/// The metric being accumulated, chosen once before propagation.
#[derive(Debug, Clone)]
pub enum Accumulator {
    Eccentricity(Vec<f64>),
    AverageDistance { hops: Vec<f64>, distances: Vec<u32> },
    Betweenness(PairTally),
    Farness(PairTally),
    HarmonicFarness(PairTally),
}

impl Accumulator {
    /// Accumulator for a metric that only needs reachability rounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnsupportedMetric`] for a shortest-path
    /// metric.
    pub fn all_paths(metric: ScoreType, n: usize) -> Result<Self, ScoringError> {
        match metric {
            ScoreType::Eccentricity => Ok(Self::Eccentricity(vec![0.0; n])),
            ScoreType::AverageDistance => Ok(Self::AverageDistance {
                hops: vec![0.0; n],
                distances: Vec::new(),
            }),
            _ => Err(ScoringError::UnsupportedMetric {
                metric,
                mode: PropagationClass::AllPaths,
            }),
        }
    }

    /// Accumulator for a metric that scores confirmed shortest-path pairs.
    ///
    /// `selection` restricts which endpoints count, in compacted positions.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnsupportedMetric`] for eccentricity or
    /// average distance.
    pub fn shortest_paths(
        metric: ScoreType,
        n: usize,
        selection: Option<FixedBitSet>,
    ) -> Result<Self, ScoringError> {
        let tally = PairTally::new(n, selection);
        match metric {
            ScoreType::Betweenness => Ok(Self::Betweenness(tally)),
            ScoreType::Farness | ScoreType::Closeness => Ok(Self::Farness(tally)),
            ScoreType::HarmonicFarness | ScoreType::HarmonicCloseness => {
                Ok(Self::HarmonicFarness(tally))
            }
            ScoreType::Eccentricity | ScoreType::AverageDistance => {
                Err(ScoringError::UnsupportedMetric {
                    metric,
                    mode: PropagationClass::ShortestPaths,
                })
            }
        }
    }

    /// Final compacted scores and distance list for `metric`.
    ///
    /// Closeness inverts farness (zero stays zero); harmonic closeness
    /// divides harmonic farness by `vertex_count`, the full graph size.
    #[must_use]
    pub fn finish(self, metric: ScoreType, vertex_count: usize) -> (Vec<f64>, Vec<u32>) {
        match self {
            Self::Eccentricity(hops) => (hops, Vec::new()),
            Self::AverageDistance { hops, distances } => (hops, distances),
            Self::Betweenness(t) => (t.scores, Vec::new()),
            Self::Farness(t) => {
                let scores = if metric == ScoreType::Closeness {
                    t.scores
                        .into_iter()
                        .map(|f| if f == 0.0 { 0.0 } else { 1.0 / f })
                        .collect()
                } else {
                    t.scores
                };
                (scores, Vec::new())
            }
            Self::HarmonicFarness(t) => {
                let scores = if metric == ScoreType::HarmonicCloseness && vertex_count > 0 {
                    let n = vertex_count as f64;
                    t.scores.into_iter().map(|h| h / n).collect()
                } else {
                    t.scores
                };
                (scores, Vec::new())
            }
        }
    }
}

impl RoundAccumulator for Accumulator {
    fn on_round_advance(&mut self, view: &RoundView<'_>) {
        match self {
            Self::Eccentricity(hops) => {
                for v in view.turn.ones() {
                    hops[v] += 1.0;
                }
            }
            Self::AverageDistance { hops, distances } => {
                for v in view.turn.ones() {
                    hops[v] += 1.0;
                }
                for r in view.forward.receivers().ones() {
                    let fresh = view.forward.send_buffer(r).count_ones(..);
                    distances.extend(std::iter::repeat_n(view.round, fresh));
                }
            }
            Self::Betweenness(PairTally { scores, selection }) => {
                for v in view.turn.ones() {
                    for w in view.confirmed(v) {
                        if view.symmetric && w < v {
                            continue;
                        }
                        if !(selected(selection.as_ref(), v) && selected(selection.as_ref(), w)) {
                            continue;
                        }
                        for i in view.interior(v, w).ones() {
                            scores[i] += 1.0;
                        }
                    }
                }
            }
            Self::Farness(PairTally { scores, selection }) => {
                for v in view.turn.ones() {
                    for w in view.confirmed(v) {
                        if selected(selection.as_ref(), w) {
                            let inside = view.interior(v, w).count_ones(..);
                            scores[v] += (inside + 1) as f64;
                        }
                    }
                }
            }
            Self::HarmonicFarness(PairTally { scores, selection }) => {
                for v in view.turn.ones() {
                    for w in view.confirmed(v) {
                        if view.symmetric && w < v {
                            continue;
                        }
                        let credit_v = selected(selection.as_ref(), w);
                        let credit_w = view.symmetric && selected(selection.as_ref(), v);
                        if !(credit_v || credit_w) {
                            continue;
                        }
                        let share = 1.0 / (view.interior(v, w).count_ones(..) + 1) as f64;
                        if credit_v {
                            scores[v] += share;
                        }
                        if credit_w {
                            scores[w] += share;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_paths_rejects_pair_metrics() {
        for metric in [
            ScoreType::Betweenness,
            ScoreType::Closeness,
            ScoreType::Farness,
            ScoreType::HarmonicCloseness,
            ScoreType::HarmonicFarness,
        ] {
            let err = Accumulator::all_paths(metric, 3).unwrap_err();
            assert!(
                matches!(
                    err,
                    ScoringError::UnsupportedMetric {
                        mode: PropagationClass::AllPaths,
                        ..
                    }
                ),
                "{metric}: {err}"
            );
        }
    }

    #[test]
    fn shortest_paths_rejects_hop_metrics() {
        for metric in [ScoreType::Eccentricity, ScoreType::AverageDistance] {
            let err = Accumulator::shortest_paths(metric, 3, None).unwrap_err();
            assert!(
                matches!(
                    err,
                    ScoringError::UnsupportedMetric {
                        mode: PropagationClass::ShortestPaths,
                        ..
                    }
                ),
                "{metric}: {err}"
            );
        }
    }

    #[test]
    fn closeness_inverts_and_keeps_zero() {
        let acc = Accumulator::Farness(PairTally {
            scores: vec![4.0, 0.0, 2.0],
            selection: None,
        });
        let (scores, distances) = acc.finish(ScoreType::Closeness, 3);
        assert!((scores[0] - 0.25).abs() < 1e-12);
        assert!(scores[1].abs() < 1e-12);
        assert!((scores[2] - 0.5).abs() < 1e-12);
        assert!(distances.is_empty());
    }

    #[test]
    fn harmonic_closeness_divides_by_vertex_count() {
        let acc = Accumulator::HarmonicFarness(PairTally {
            scores: vec![2.0, 1.0],
            selection: None,
        });
        let (scores, _) = acc.finish(ScoreType::HarmonicCloseness, 4);
        assert!((scores[0] - 0.5).abs() < 1e-12);
        assert!((scores[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn farness_finish_is_identity() {
        let acc = Accumulator::Farness(PairTally {
            scores: vec![6.0, 4.0],
            selection: None,
        });
        let (scores, _) = acc.finish(ScoreType::Farness, 2);
        assert_eq!(scores, vec![6.0, 4.0]);
    }

    #[test]
    fn selection_helper_defaults_to_everything() {
        assert!(selected(None, 7));
        let mut mask = FixedBitSet::with_capacity(3);
        mask.insert(1);
        assert!(selected(Some(&mask), 1));
        assert!(!selected(Some(&mask), 0));
    }
}
