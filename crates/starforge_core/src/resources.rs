//! Strategic resources consumed by build projects.
//!
//! Industry is tracked separately as a plain `i32`; the pool only holds the
//! material resources a design may require on top of industry.
//!
//! All calculations use integer math for deterministic simulation.

use serde::{Deserialize, Serialize};

/// A material resource that designs may require.
///
/// The declaration order is the fixed enumeration order used everywhere a
/// pool is walked (advancement, serialization, reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Fuel for warp cores and power plants.
    Deuterium,
    /// Crystals regulating matter/antimatter reactions.
    Dilithium,
    /// Bulk ore and alloys.
    RawMaterials,
}

impl ResourceKind {
    /// Number of resource kinds.
    pub const COUNT: usize = 3;

    /// Every kind in enumeration order.
    pub const ALL: [Self; Self::COUNT] = [Self::Deuterium, Self::Dilithium, Self::RawMaterials];

    /// Position of this kind in [`ResourceKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Deuterium => 0,
            Self::Dilithium => 1,
            Self::RawMaterials => 2,
        }
    }

    /// Look a kind up by its enumeration index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Deuterium),
            1 => Some(Self::Dilithium),
            2 => Some(Self::RawMaterials),
            _ => None,
        }
    }

    /// Get the display name for this resource.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Deuterium => "Deuterium",
            Self::Dilithium => "Dilithium",
            Self::RawMaterials => "Raw Materials",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Quantities of every [`ResourceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    amounts: [i32; ResourceKind::COUNT],
}

impl ResourcePool {
    /// An empty pool.
    pub const ZERO: Self = Self {
        amounts: [0; ResourceKind::COUNT],
    };

    /// Create a pool from explicit amounts.
    #[must_use]
    pub const fn new(deuterium: i32, dilithium: i32, raw_materials: i32) -> Self {
        Self {
            amounts: [deuterium, dilithium, raw_materials],
        }
    }

    /// Create a pool holding only one resource.
    #[must_use]
    pub fn single(kind: ResourceKind, amount: i32) -> Self {
        let mut pool = Self::ZERO;
        pool.set(kind, amount);
        pool
    }

    /// Amount of `kind` held.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        self.amounts[kind.index()]
    }

    /// Amount at a raw enumeration index; 0 for an unknown index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> i32 {
        self.amounts.get(index).copied().unwrap_or(0)
    }

    /// Overwrite the amount of `kind`.
    pub fn set(&mut self, kind: ResourceKind, amount: i32) {
        self.amounts[kind.index()] = amount;
    }

    /// Add `delta` to `kind`.
    pub fn add(&mut self, kind: ResourceKind, delta: i32) {
        let slot = &mut self.amounts[kind.index()];
        *slot = slot.saturating_add(delta);
    }

    /// Subtract `delta` from `kind`, never going below zero.
    ///
    /// Returns the amount actually removed.
    pub fn subtract(&mut self, kind: ResourceKind, delta: i32) -> i32 {
        let slot = &mut self.amounts[kind.index()];
        let removed = delta.clamp(0, (*slot).max(0));
        *slot = (*slot - removed).max(0);
        removed
    }

    /// True if every amount is zero or less.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.iter().all(|&a| a <= 0)
    }

    /// True if this pool holds at least as much of every kind as `other`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|&kind| self.get(kind) >= other.get(kind))
    }

    /// Per-kind `self - other`, floored at zero.
    #[must_use]
    pub fn saturating_sub(&self, other: &Self) -> Self {
        let mut out = Self::ZERO;
        for kind in ResourceKind::ALL {
            out.set(kind, (self.get(kind) - other.get(kind)).max(0));
        }
        out
    }

    /// Iterate `(kind, amount)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i32)> + '_ {
        ResourceKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

impl std::ops::Index<ResourceKind> for ResourcePool {
    type Output = i32;

    fn index(&self, kind: ResourceKind) -> &Self::Output {
        &self.amounts[kind.index()]
    }
}

impl std::ops::Add for ResourcePool {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign for ResourcePool {
    fn add_assign(&mut self, rhs: Self) {
        for kind in ResourceKind::ALL {
            self.add(kind, rhs.get(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_index_roundtrip() {
        for (i, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(ResourceKind::from_index(i), Some(*kind));
        }
        assert_eq!(ResourceKind::from_index(3), None);
    }

    #[test]
    fn test_unknown_index_reads_zero() {
        let pool = ResourcePool::new(5, 6, 7);
        assert_eq!(pool.get_by_index(2), 7);
        assert_eq!(pool.get_by_index(3), 0);
        assert_eq!(pool.get_by_index(usize::MAX), 0);
    }

    #[test]
    fn test_subtract_clamps_at_zero() {
        let mut pool = ResourcePool::single(ResourceKind::Dilithium, 10);
        assert_eq!(pool.subtract(ResourceKind::Dilithium, 4), 4);
        assert_eq!(pool[ResourceKind::Dilithium], 6);

        assert_eq!(pool.subtract(ResourceKind::Dilithium, 50), 6);
        assert_eq!(pool[ResourceKind::Dilithium], 0);

        // Negative deltas are ignored rather than adding stock.
        assert_eq!(pool.subtract(ResourceKind::Dilithium, -5), 0);
        assert_eq!(pool[ResourceKind::Dilithium], 0);
    }

    #[test]
    fn test_add_and_covers() {
        let mut pool = ResourcePool::ZERO;
        pool.add(ResourceKind::Deuterium, 3);
        pool += ResourcePool::new(1, 2, 3);
        assert_eq!(pool, ResourcePool::new(4, 2, 3));

        assert!(pool.covers(&ResourcePool::new(4, 2, 0)));
        assert!(!pool.covers(&ResourcePool::new(5, 0, 0)));
        assert!(!pool.is_empty());
        assert!(ResourcePool::ZERO.is_empty());
    }

    #[test]
    fn test_saturating_sub() {
        let required = ResourcePool::new(10, 0, 40);
        let invested = ResourcePool::new(12, 0, 15);
        assert_eq!(required.saturating_sub(&invested), ResourcePool::new(0, 0, 25));
    }

    #[test]
    fn test_iter_order() {
        let pool = ResourcePool::new(1, 2, 3);
        let kinds: Vec<_> = pool.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, ResourceKind::ALL.to_vec());
    }
}
