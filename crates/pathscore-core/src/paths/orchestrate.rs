//! Round loop for symmetric and directed propagation.
//!
//! Symmetric runs drive one [`Frontier`]. Directed shortest-path runs drive
//! a forward and a backward instance in lock-step so a pair is confirmed
//! only once both walks agree on it in the same round. Directed runs that
//! only need hop counts drive one instance along edge orientation, so each
//! vertex ends up knowing the sources that reach it.

use std::sync::atomic::{AtomicBool, Ordering};

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::error::ScoringError;

use super::accumulate::{RoundAccumulator, RoundView};
use super::direction::Adjacency;
use super::frontier::Frontier;

/// How many instances to drive, and what each round reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// One instance over the symmetric adjacency. With `pairs`, exclusions
    /// are tracked and `turn` marks receivers; otherwise `turn` marks the
    /// sources whose wave advanced.
    Symmetric { pairs: bool },
    /// Forward and backward instances in lock-step.
    Paired,
    /// One instance pushing along edge orientation. `turn` marks the
    /// sources whose wave advanced.
    Directed,
}

impl Walk {
    /// Pick the walk for an adjacency and metric class.
    #[must_use]
    pub const fn select(adjacency: &Adjacency, shortest_paths: bool) -> Self {
        if adjacency.is_symmetric() {
            Self::Symmetric {
                pairs: shortest_paths,
            }
        } else if shortest_paths {
            Self::Paired
        } else {
            Self::Directed
        }
    }

    /// Whether rounds confirm shortest-path pairs, which needs exclusion
    /// bookkeeping.
    #[must_use]
    pub const fn scores_pairs(self) -> bool {
        matches!(self, Self::Symmetric { pairs: true } | Self::Paired)
    }
}

/// Final state of a completed walk, in compacted positions.
#[derive(Debug)]
pub struct Outcome {
    pub reachability: Vec<FixedBitSet>,
    pub rounds: u32,
}

/// Run rounds until every instance converges.
///
/// Every vertex of the adjacency starts on the frontier. The cancellation
/// flag is checked before each round.
///
/// # Errors
///
/// Returns [`ScoringError::Cancelled`] if `cancel` is raised; all partial
/// state is dropped.
pub fn propagate<A: RoundAccumulator + ?Sized>(
    adjacency: &Adjacency,
    walk: Walk,
    accumulator: &mut A,
    cancel: Option<&AtomicBool>,
) -> Result<Outcome, ScoringError> {
    let n = adjacency.len();
    let pairs = walk.scores_pairs();
    let links = if walk == Walk::Directed {
        adjacency.backward()
    } else {
        adjacency.forward()
    };
    let mut forward = Frontier::seeded_all(n, pairs);
    let mut backward = (walk == Walk::Paired).then(|| Frontier::seeded_all(n, true));
    let mut advanced = FixedBitSet::with_capacity(n);
    let mut rounds: u32 = 0;

    debug!(vertices = n, ?walk, "propagation started");

    while !forward.is_converged() || backward.as_ref().is_some_and(|b| !b.is_converged()) {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            debug!(rounds, "propagation cancelled");
            return Err(ScoringError::Cancelled { rounds });
        }
        rounds += 1;
        trace!(
            round = rounds,
            frontier = forward.frontier().count_ones(..),
            "round"
        );

        forward.merge_pending();
        if let Some(back) = backward.as_mut() {
            back.merge_pending();
        }
        forward.deliver(links, (!pairs).then_some(&mut advanced));
        if let Some(back) = backward.as_mut() {
            back.deliver(adjacency.backward(), None);
        }

        let view = RoundView {
            round: rounds,
            forward: &forward,
            backward: backward.as_ref().unwrap_or(&forward),
            turn: if pairs { forward.receivers() } else { &advanced },
            symmetric: matches!(walk, Walk::Symmetric { .. }),
        };
        accumulator.on_round_advance(&view);

        forward.advance();
        if let Some(back) = backward.as_mut() {
            back.advance();
        }
        advanced.clear();
    }

    debug!(rounds, "propagation converged");

    let mut reachability = forward.into_traversal();
    if let Some(back) = backward {
        for (reach, extra) in reachability.iter_mut().zip(back.into_traversal()) {
            reach.union_with(&extra);
        }
    }
    Ok(Outcome {
        reachability,
        rounds,
    })
}
