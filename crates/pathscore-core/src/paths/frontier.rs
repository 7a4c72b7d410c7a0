//! Synchronous multi-source propagation over bit-vectors.
//!
//! # Overview
//!
//! Every vertex starts as its own source. Each round, vertices on the
//! frontier push what they know to their linked neighbours, so after `k`
//! rounds `traversal[v]` holds every source within `k - 1` steps. No paths
//! are materialised; the per-round deltas carry enough structure for the
//! accumulators to recover shortest-path counts.
//!
//! # Round
//!
//! 1. [`Frontier::merge_pending`]: fold `send_buffer[v]` into
//!    `traversal[v]` for frontier vertices and remember the delta as
//!    `send_fails[v]`.
//! 2. [`Frontier::deliver`]: push `traversal[v] - traversal[n]` into
//!    `send_buffer[n]`. A source that `v` forwards somewhere leaves
//!    `send_fails[v]`; whatever is left there died at `v` and is recorded
//!    in `exclusions`.
//! 3. The caller scores the round, then calls [`Frontier::advance`].
//!
//! The walk has converged once a round delivers nothing.

use fixedbitset::FixedBitSet;

/// Per-call propagation state over a compacted vertex space of size `n`.
#[derive(Debug, Clone)]
pub struct Frontier {
    traversal: Vec<FixedBitSet>,
    send_buffer: Vec<FixedBitSet>,
    send_fails: Vec<FixedBitSet>,
    exclusions: Vec<FixedBitSet>,
    update: FixedBitSet,
    next_update: FixedBitSet,
    track_exclusions: bool,
}

impl Frontier {
    /// Start with every vertex on the frontier.
    #[must_use]
    pub fn seeded_all(n: usize, track_exclusions: bool) -> Self {
        let mut update = FixedBitSet::with_capacity(n);
        update.insert_range(..);
        Self::with_frontier(n, update, track_exclusions)
    }

    fn with_frontier(n: usize, update: FixedBitSet, track_exclusions: bool) -> Self {
        let empty = FixedBitSet::with_capacity(n);
        let tracked = if track_exclusions { n } else { 0 };
        Self {
            traversal: vec![empty.clone(); n],
            send_buffer: vec![empty.clone(); n],
            send_fails: vec![empty.clone(); tracked],
            exclusions: vec![empty.clone(); tracked],
            update,
            next_update: empty,
            track_exclusions,
        }
    }

    /// Number of vertices in the compacted space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.traversal.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traversal.is_empty()
    }

    /// No vertex is waiting to merge or forward anything.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.update.count_ones(..) == 0
    }

    /// Vertices processed this round.
    #[must_use]
    pub const fn frontier(&self) -> &FixedBitSet {
        &self.update
    }

    /// Vertices that received a non-empty delta this round. Valid between
    /// [`Self::deliver`] and [`Self::advance`].
    #[must_use]
    pub const fn receivers(&self) -> &FixedBitSet {
        &self.next_update
    }

    /// Sources known to reach `v`, or that `v` reaches, depending on the
    /// direction this instance was driven in.
    #[must_use]
    pub fn traversal(&self, v: usize) -> &FixedBitSet {
        &self.traversal[v]
    }

    /// Sources delivered to `v` this round and not yet merged.
    #[must_use]
    pub fn send_buffer(&self, v: usize) -> &FixedBitSet {
        &self.send_buffer[v]
    }

    /// Vertices where the wave of `source` died. Empty when exclusions are
    /// not tracked.
    #[must_use]
    pub fn exclusions(&self, source: usize) -> Option<&FixedBitSet> {
        self.exclusions.get(source)
    }

    /// Consume the instance, returning the final traversal sets.
    #[must_use]
    pub fn into_traversal(self) -> Vec<FixedBitSet> {
        self.traversal
    }

    /// Step 1: merge buffered deliveries for every frontier vertex.
    pub fn merge_pending(&mut self) {
        for v in self.update.ones() {
            self.traversal[v].union_with(&self.send_buffer[v]);
            self.traversal[v].insert(v);
            if self.track_exclusions {
                self.send_fails[v].clone_from(&self.send_buffer[v]);
            }
            self.send_buffer[v].clear();
        }
    }

    /// Step 2: push deltas along `links` and record dead ends.
    ///
    /// Every receiver of a non-empty delta is queued for the next round (see
    /// [`Self::receivers`]). When `advanced` is given, the sources carried by
    /// those deltas are added to it.
    pub fn deliver(&mut self, links: &[Vec<usize>], mut advanced: Option<&mut FixedBitSet>) {
        let active: Vec<usize> = self.update.ones().collect();
        for v in active {
            for &n in &links[v] {
                if self.traversal[v] == self.traversal[n] {
                    continue;
                }
                let mut diff = self.traversal[v].clone();
                diff.difference_with(&self.traversal[n]);
                if diff.count_ones(..) == 0 {
                    continue;
                }
                if self.track_exclusions {
                    self.send_fails[v].difference_with(&diff);
                }
                self.send_buffer[n].union_with(&diff);
                self.next_update.insert(n);
                if let Some(advanced) = advanced.as_deref_mut() {
                    advanced.union_with(&diff);
                }
            }
            if self.track_exclusions {
                for source in self.send_fails[v].ones() {
                    self.exclusions[source].insert(v);
                }
            }
        }
    }

    /// Step 3: the next frontier becomes current.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.update, &mut self.next_update);
        self.next_update.clear();
    }
}
