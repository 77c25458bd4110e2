//! Production centers: the colonies and shipyards that host build slots.

use serde::{Deserialize, Serialize};

use crate::components::{CivId, MapLocation, ProductionCenterId};
use crate::error::{GameError, Result};
use crate::project::ProjectSite;
use crate::resources::ResourcePool;
use crate::slot::BuildSlot;

/// A game entity capable of hosting build slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionCenter {
    /// Unique identifier.
    pub id: ProductionCenterId,
    /// Display name.
    pub name: String,
    /// Owning civilization.
    pub owner: CivId,
    /// Sector the center sits in.
    pub location: MapLocation,
    /// Industry produced every turn.
    pub industry_output: i32,
    /// Resources produced every turn.
    pub resource_output: ResourcePool,
    slots: Vec<BuildSlot>,
}

impl ProductionCenter {
    /// Create a center without slots.
    #[must_use]
    pub fn new(
        id: ProductionCenterId,
        name: impl Into<String>,
        owner: CivId,
        location: MapLocation,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            location,
            industry_output: 0,
            resource_output: ResourcePool::ZERO,
            slots: Vec::new(),
        }
    }

    /// Set the per-turn output.
    #[must_use]
    pub fn with_output(mut self, industry: i32, resources: ResourcePool) -> Self {
        self.industry_output = industry;
        self.resource_output = resources;
        self
    }

    /// Add `count` empty slots at `priority`.
    #[must_use]
    pub fn with_slots(mut self, count: usize, priority: u8) -> Self {
        self.slots
            .extend(std::iter::repeat_with(|| BuildSlot::new(priority)).take(count));
        self
    }

    /// Append a slot and return its index.
    pub fn add_slot(&mut self, slot: BuildSlot) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    /// Site used by projects built here.
    #[must_use]
    pub const fn site(&self) -> ProjectSite {
        ProjectSite {
            owner: self.owner,
            center: self.id,
            location: self.location,
        }
    }

    /// Industry and resources available at the start of a turn.
    #[must_use]
    pub const fn available_output(&self) -> (i32, ResourcePool) {
        (self.industry_output, self.resource_output)
    }

    /// All slots in index order.
    #[must_use]
    pub fn slots(&self) -> &[BuildSlot] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [BuildSlot] {
        &mut self.slots
    }

    /// Get a slot by index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SlotNotFound`] if `index` is out of range.
    pub fn slot(&self, index: usize) -> Result<&BuildSlot> {
        self.slots.get(index).ok_or(GameError::SlotNotFound {
            center: self.id,
            slot: index,
        })
    }

    /// Get a mutable slot by index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SlotNotFound`] if `index` is out of range.
    pub fn slot_mut(&mut self, index: usize) -> Result<&mut BuildSlot> {
        let center = self.id;
        self.slots
            .get_mut(index)
            .ok_or(GameError::SlotNotFound { center, slot: index })
    }

    /// Slot indices in processing order: highest priority first, ties by index.
    #[must_use]
    pub fn slot_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&i| (std::cmp::Reverse(self.slots[i].priority()), i));
        order
    }
}
