//! Mapping between full vertex positions and the compacted index space.
//!
//! Propagation only allocates bit-vectors for eligible vertices. The
//! [`IndexMap`] records which full positions were kept, in ascending order,
//! so compacted results can be placed back at their original positions.
//! Ineligible vertices come back with score 0 and empty reachability.

use fixedbitset::FixedBitSet;

/// Bijection between eligible full positions and `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    full_len: usize,
    members: Vec<usize>,
    compact: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build from the ascending list of kept full positions.
    #[must_use]
    pub fn from_members(full_len: usize, members: Vec<usize>) -> Self {
        let mut compact = vec![None; full_len];
        for (i, &full) in members.iter().enumerate() {
            compact[full] = Some(i);
        }
        Self {
            full_len,
            members,
            compact,
        }
    }

    /// Keep every position for which `keep` is true.
    pub fn filtered(full_len: usize, mut keep: impl FnMut(usize) -> bool) -> Self {
        let members = (0..full_len).filter(|&p| keep(p)).collect();
        Self::from_members(full_len, members)
    }

    /// Number of kept vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub const fn full_len(&self) -> usize {
        self.full_len
    }

    /// Kept full positions, indexed by compacted position.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Compacted position of a full position, if it was kept.
    #[must_use]
    pub fn compact(&self, full: usize) -> Option<usize> {
        self.compact.get(full).copied().flatten()
    }

    /// Full position of a compacted position.
    #[must_use]
    pub fn full(&self, compact: usize) -> usize {
        self.members[compact]
    }

    /// Place compacted scores at their full positions, zero elsewhere.
    #[must_use]
    pub fn project_scores(&self, compact_scores: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.full_len];
        for (&full, &score) in self.members.iter().zip(compact_scores) {
            out[full] = score;
        }
        out
    }

    /// Rewrite compacted bit-vectors into full-size ones at their full
    /// positions, remapping the bits as well. Unkept positions get an empty
    /// set.
    #[must_use]
    pub fn project_sets(&self, compact_sets: &[FixedBitSet]) -> Vec<FixedBitSet> {
        let mut out = vec![FixedBitSet::with_capacity(self.full_len); self.full_len];
        for (&full, set) in self.members.iter().zip(compact_sets) {
            let target = &mut out[full];
            for bit in set.ones() {
                target.insert(self.members[bit]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_and_full_are_inverse() {
        let map = IndexMap::filtered(6, |p| p % 2 == 1);
        assert_eq!(map.members(), &[1, 3, 5]);
        for c in 0..map.len() {
            assert_eq!(map.compact(map.full(c)), Some(c));
        }
        assert_eq!(map.compact(2), None);
        assert_eq!(map.compact(99), None);
    }

    #[test]
    fn scores_land_on_original_positions() {
        let map = IndexMap::from_members(4, vec![0, 2]);
        assert_eq!(map.project_scores(&[1.5, 2.5]), vec![1.5, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn sets_are_remapped_bit_by_bit() {
        let map = IndexMap::from_members(4, vec![1, 3]);
        let mut a = FixedBitSet::with_capacity(2);
        a.insert(0);
        a.insert(1);
        let b = FixedBitSet::with_capacity(2);
        let out = map.project_sets(&[a, b]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1].ones().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(out[3].count_ones(..), 0);
        assert_eq!(out[0].count_ones(..), 0);
        assert_eq!(out[0].len(), 4);
    }
}
