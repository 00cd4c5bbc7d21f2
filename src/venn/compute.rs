//! Intersection and per-region counts.
//!
//! A region is identified by a membership bitmask: bit `i` is set when the
//! element belongs to input set `i`. Two sets give regions 1..=3, three sets
//! give 1..=7; mask 0 is never populated.

use std::collections::BTreeSet;

/// Elements present in every set. Empty when `sets` is empty.
pub fn intersection(sets: &[BTreeSet<String>]) -> BTreeSet<String> {
    let Some((first, rest)) = sets.split_first() else {
        return BTreeSet::new();
    };
    first.iter().filter(|item| rest.iter().all(|set| set.contains(*item))).cloned().collect()
}

/// Membership bitmask of `item` across `sets`.
fn membership_mask(item: &str, sets: &[BTreeSet<String>]) -> usize {
    sets.iter()
        .enumerate()
        .filter(|(_, set)| set.contains(item))
        .fold(0, |mask, (idx, _)| mask | (1 << idx))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VennCounts {
    set_count: usize,
    /// Indexed by membership mask; index 0 unused.
    regions: Vec<usize>,
}

impl VennCounts {
    pub fn from_sets(sets: &[BTreeSet<String>]) -> Self {
        let mut regions = vec![0; 1 << sets.len()];
        let union: BTreeSet<&String> = sets.iter().flatten().collect();
        for item in union {
            regions[membership_mask(item, sets)] += 1;
        }
        Self { set_count: sets.len(), regions }
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    fn full_mask(&self) -> usize {
        (1 << self.set_count) - 1
    }

    /// Elements whose membership is exactly `mask`.
    pub fn region(&self, mask: usize) -> usize {
        self.regions.get(mask).copied().unwrap_or(0)
    }

    /// `(mask, count)` for every non-empty membership pattern, ascending by mask.
    pub fn regions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.full_mask()).map(move |mask| (mask, self.region(mask)))
    }

    pub fn shared_by_all(&self) -> usize {
        if self.set_count == 0 {
            return 0;
        }
        self.region(self.full_mask())
    }

    pub fn union_size(&self) -> usize {
        self.regions.iter().sum()
    }

    /// Size of input set `index`.
    pub fn set_size(&self, index: usize) -> usize {
        self.regions().filter(|(mask, _)| mask & (1 << index) != 0).map(|(_, count)| count).sum()
    }
}

/// Region id in set order, e.g. `"101"` for "first and third set only".
pub fn region_id(mask: usize, set_count: usize) -> String {
    (0..set_count).map(|idx| if mask & (1 << idx) != 0 { '1' } else { '0' }).collect()
}
