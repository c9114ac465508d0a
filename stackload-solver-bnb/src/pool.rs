//! Pile storage shared by every branch of a search.
//!
//! The [`PileArena`] owns the consolidated piles for one solve. Each branch
//! carries a [`PilePool`], a [`FixedBitSet`] of removed arena slots, so
//! deriving a child pool copies a few words instead of the piles themselves.

use fixedbitset::FixedBitSet;
use stackload_core::{Pile, PileId};

/// Immutable, largest-first pile storage indexed by [`PileId`].
#[derive(Debug, Clone, PartialEq)]
pub struct PileArena {
    piles: Vec<Pile>,
}

impl PileArena {
    /// Wrap consolidated piles.
    ///
    /// Piles are re-sorted largest first and their ids reassigned to match
    /// their position, so arena order is the order the search consumes them.
    #[must_use]
    pub fn new(mut piles: Vec<Pile>) -> Self {
        piles.sort_by(|lhs, rhs| lhs.cmp_largest_first(rhs).then(lhs.id.cmp(&rhs.id)));
        for (position, pile) in piles.iter_mut().enumerate() {
            pile.id = PileId(position);
        }
        Self { piles }
    }

    /// Look up a pile.
    #[must_use]
    pub fn get(&self, id: PileId) -> Option<&Pile> {
        self.piles.get(id.0)
    }

    /// Number of piles in the arena.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.piles.len()
    }

    /// Whether the arena holds no piles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// Every pile, largest first.
    #[must_use]
    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }
}

/// The piles still waiting for a vehicle on one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PilePool {
    removed: FixedBitSet,
}

impl PilePool {
    /// A pool containing every pile of `arena`.
    #[must_use]
    pub fn full(arena: &PileArena) -> Self {
        Self {
            removed: FixedBitSet::with_capacity(arena.len()),
        }
    }

    /// Whether `id` is still in the pool.
    #[must_use]
    pub fn contains(&self, id: PileId) -> bool {
        id.0 < self.removed.len() && !self.removed.contains(id.0)
    }

    /// Derive a pool without `ids`; `self` is left untouched.
    ///
    /// Ids that are unknown or already removed are ignored.
    #[must_use]
    pub fn without(&self, ids: &[PileId]) -> Self {
        let mut derived = self.clone();
        for id in ids.iter().filter(|id| id.0 < self.removed.len()) {
            derived.removed.insert(id.0);
        }
        derived
    }

    /// Number of piles left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removed.len() - self.removed.count_ones(..)
    }

    /// Whether every pile has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.count_ones(..) == self.removed.len()
    }

    /// Remaining piles in arena order.
    pub fn iter<'a>(&'a self, arena: &'a PileArena) -> impl Iterator<Item = &'a Pile> + 'a {
        self.removed
            .zeroes()
            .filter_map(|index| arena.get(PileId(index)))
    }

    /// The largest remaining pile by length, then height.
    #[must_use]
    pub fn largest<'a>(&'a self, arena: &'a PileArena) -> Option<&'a Pile> {
        self.iter(arena).next()
    }

    /// Summed side-view area of the remaining piles.
    #[must_use]
    pub fn side_area(&self, arena: &PileArena) -> f64 {
        self.iter(arena).map(Pile::side_area).sum()
    }
}
