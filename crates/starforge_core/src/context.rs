//! The explicitly passed simulation context.
//!
//! [`GameContext`] owns everything construction needs: rules, the design
//! registry, the civilization ledger and every production center. There is
//! no global state; callers hold a context and pass it around.
//!
//! # Example
//!
//! ```
//! use starforge_core::prelude::*;
//!
//! let designs: DesignRegistry = [BuildDesign::new(
//!     DesignId(1),
//!     "Scout",
//!     ProjectKind::Ship,
//!     60,
//!     ResourcePool::ZERO,
//! )]
//! .into_iter()
//! .collect();
//!
//! let mut ctx = GameContext::new(BuildRules::default(), designs);
//! ctx.add_civilization(Civilization::new(CivId(1), "Federation"));
//! ctx.add_center(
//!     ProductionCenter::new(ProductionCenterId(1), "Earth", CivId(1), MapLocation::new(4, 4))
//!         .with_output(30, ResourcePool::ZERO)
//!         .with_slots(1, BuildRules::NORMAL_PRIORITY),
//! )
//! .unwrap();
//!
//! ctx.queue_project(ProductionCenterId(1), 0, DesignId(1), None).unwrap();
//! ctx.process_turn();
//! let summary = ctx.process_turn();
//! assert_eq!(summary.completed.len(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::center::ProductionCenter;
use crate::civilization::{Civilization, CivilizationLedger};
use crate::components::{DesignId, ProductionCenterId};
use crate::config::BuildRules;
use crate::design::{DesignLookup, DesignRegistry};
use crate::error::{GameError, Result};
use crate::notify::{tag, Observers, Property, PropertyChange, SubscriptionId};
use crate::project::BuildProject;
use crate::slot::{BuildQueueItem, BuildSlot};

/// Owner of all construction state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GameContext {
    pub(crate) turn: u64,
    pub(crate) rules: BuildRules,
    pub(crate) designs: DesignRegistry,
    pub(crate) civilizations: CivilizationLedger,
    pub(crate) centers: BTreeMap<ProductionCenterId, ProductionCenter>,
    #[serde(skip)]
    pub(crate) observers: Observers,
}

impl GameContext {
    /// Create a context at turn 0 with no civilizations or centers.
    #[must_use]
    pub fn new(rules: BuildRules, designs: DesignRegistry) -> Self {
        Self {
            turn: 0,
            rules,
            designs,
            civilizations: CivilizationLedger::new(),
            centers: BTreeMap::new(),
            observers: Observers::new(),
        }
    }

    /// Number of turns processed so far.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Construction rules in force.
    #[must_use]
    pub const fn rules(&self) -> &BuildRules {
        &self.rules
    }

    /// The design registry.
    #[must_use]
    pub const fn designs(&self) -> &DesignRegistry {
        &self.designs
    }

    /// The civilization ledger.
    #[must_use]
    pub const fn civilizations(&self) -> &CivilizationLedger {
        &self.civilizations
    }

    /// Mutable access to the civilization ledger.
    pub fn civilizations_mut(&mut self) -> &mut CivilizationLedger {
        &mut self.civilizations
    }

    /// Register a civilization.
    pub fn add_civilization(&mut self, civilization: Civilization) {
        self.civilizations.insert(civilization);
    }

    /// Register a production center.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CivilizationNotFound`] if the owner is unknown and
    /// [`GameError::InvalidArgument`] if the id is already taken.
    pub fn add_center(&mut self, center: ProductionCenter) -> Result<()> {
        if !self.civilizations.contains(center.owner) {
            return Err(GameError::CivilizationNotFound(center.owner));
        }
        if self.centers.contains_key(&center.id) {
            return Err(GameError::InvalidArgument(format!(
                "duplicate production center {:?}",
                center.id
            )));
        }
        self.centers.insert(center.id, center);
        Ok(())
    }

    /// All production centers in id order.
    pub fn centers(&self) -> impl Iterator<Item = &ProductionCenter> {
        self.centers.values()
    }

    /// Get a production center by ID.
    pub fn center(&self, id: ProductionCenterId) -> Result<&ProductionCenter> {
        self.centers
            .get(&id)
            .ok_or(GameError::ProductionCenterNotFound(id))
    }

    /// Get a mutable production center by ID.
    pub fn center_mut(&mut self, id: ProductionCenterId) -> Result<&mut ProductionCenter> {
        self.centers
            .get_mut(&id)
            .ok_or(GameError::ProductionCenterNotFound(id))
    }

    /// Get a slot.
    pub fn slot(&self, center: ProductionCenterId, slot: usize) -> Result<&BuildSlot> {
        self.center(center)?.slot(slot)
    }

    /// Active project of a slot, if any.
    pub fn project(&self, center: ProductionCenterId, slot: usize) -> Result<Option<&BuildProject>> {
        Ok(self.slot(center, slot)?.project())
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + Send + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Remove a change listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self, center: ProductionCenterId, slot: usize, properties: Vec<Property>) {
        let changes: Vec<_> = tag(center, slot, properties).collect();
        self.observers.broadcast(&changes);
    }

    /// Start building `design` in a slot right away, bypassing its queue.
    ///
    /// Returns the project that was replaced, if any.
    pub fn start_project(
        &mut self,
        center_id: ProductionCenterId,
        slot: usize,
        design: DesignId,
    ) -> Result<Option<BuildProject>> {
        let center = self
            .centers
            .get_mut(&center_id)
            .ok_or(GameError::ProductionCenterNotFound(center_id))?;
        let project = BuildProject::create(&self.designs, design, center.site(), &self.rules)?;
        let (previous, changes) = center.slot_mut(slot)?.set_project(Some(project));
        self.notify(center_id, slot, changes);
        Ok(previous)
    }

    /// Append `design` to a slot's queue.
    ///
    /// An idle slot picks the item up immediately.
    pub fn queue_project(
        &mut self,
        center_id: ProductionCenterId,
        slot: usize,
        design: DesignId,
        priority: Option<u8>,
    ) -> Result<()> {
        let design = self
            .designs
            .build_design(design)
            .ok_or(GameError::DesignNotFound(design))?;
        let item = BuildQueueItem::new(
            design,
            priority.unwrap_or(self.rules.default_project_priority),
        );

        let center = self
            .centers
            .get_mut(&center_id)
            .ok_or(GameError::ProductionCenterNotFound(center_id))?;
        let site = center.site();
        let build_slot = center.slot_mut(slot)?;
        build_slot.enqueue(item, &self.rules)?;

        let mut changes = Vec::new();
        if !build_slot.has_project() {
            changes = build_slot.reconcile(&self.designs, site, &self.rules).changes;
        }
        self.notify(center_id, slot, changes);
        Ok(())
    }

    fn with_project<F>(&mut self, center: ProductionCenterId, slot: usize, f: F) -> Result<bool>
    where
        F: FnOnce(&mut BuildProject) -> Vec<Property>,
    {
        let changes = match self.center_mut(center)?.slot_mut(slot)?.project_mut() {
            Some(project) => f(project),
            None => return Ok(false),
        };
        self.notify(center, slot, changes);
        Ok(true)
    }

    /// Cancel the active project of a slot. It is dropped at turn end.
    ///
    /// Returns `false` if the slot is idle.
    pub fn cancel_project(&mut self, center: ProductionCenterId, slot: usize) -> Result<bool> {
        self.with_project(center, slot, |p| {
            p.cancel();
            Vec::new()
        })
    }

    /// Put the active project of a slot on hold.
    pub fn pause_project(&mut self, center: ProductionCenterId, slot: usize) -> Result<bool> {
        self.with_project(center, slot, |p| {
            p.pause();
            Vec::new()
        })
    }

    /// Take the active project of a slot off hold.
    pub fn resume_project(&mut self, center: ProductionCenterId, slot: usize) -> Result<bool> {
        self.with_project(center, slot, |p| {
            p.resume();
            Vec::new()
        })
    }

    /// Mark the active project of a slot to be bought out next turn.
    pub fn rush_project(&mut self, center: ProductionCenterId, slot: usize) -> Result<bool> {
        self.with_project(center, slot, |p| {
            p.rush();
            Vec::new()
        })
    }

    /// Set the priority of the active project of a slot.
    pub fn set_project_priority(
        &mut self,
        center: ProductionCenterId,
        slot: usize,
        priority: i32,
    ) -> Result<bool> {
        self.with_project(center, slot, |p| {
            p.set_priority(priority);
            vec![Property::Priority]
        })
    }

    /// Set the priority of a slot among its center's slots.
    pub fn set_slot_priority(
        &mut self,
        center: ProductionCenterId,
        slot: usize,
        priority: i32,
    ) -> Result<()> {
        let changes = self.center_mut(center)?.slot_mut(slot)?.set_priority(priority);
        self.notify(center, slot, changes);
        Ok(())
    }

    /// Deterministic hash of the construction state.
    ///
    /// Two contexts that went through the same turns hash equal.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.turn.hash(&mut hasher);
        for center in self.centers.values() {
            center.hash(&mut hasher);
        }
        for civ in self.civilizations.iter() {
            civ.id.hash(&mut hasher);
            civ.credits.hash(&mut hasher);
            civ.energy_surplus.hash(&mut hasher);
            civ.objects.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::components::{CivId, MapLocation};
    use crate::design::{BuildDesign, ProjectKind};
    use crate::resources::ResourcePool;

    const EARTH: ProductionCenterId = ProductionCenterId(1);

    fn context() -> GameContext {
        let designs: DesignRegistry = [
            BuildDesign::new(DesignId(1), "Scout", ProjectKind::Ship, 60, ResourcePool::ZERO),
            BuildDesign::new(DesignId(2), "Lab", ProjectKind::Building, 90, ResourcePool::ZERO),
        ]
        .into_iter()
        .collect();
        let mut ctx = GameContext::new(BuildRules::default(), designs);
        ctx.add_civilization(Civilization::new(CivId(1), "Federation"));
        ctx.add_center(
            ProductionCenter::new(EARTH, "Earth", CivId(1), MapLocation::new(4, 4))
                .with_output(30, ResourcePool::ZERO)
                .with_slots(2, BuildRules::NORMAL_PRIORITY),
        )
        .unwrap();
        ctx
    }

    #[test]
    fn test_add_center_validates_owner() {
        let mut ctx = context();
        let orphan = ProductionCenter::new(ProductionCenterId(2), "Nowhere", CivId(9), MapLocation::default());
        assert!(matches!(
            ctx.add_center(orphan),
            Err(GameError::CivilizationNotFound(CivId(9)))
        ));

        let duplicate = ProductionCenter::new(EARTH, "Earth II", CivId(1), MapLocation::default());
        assert!(ctx.add_center(duplicate).is_err());
    }

    #[test]
    fn test_queue_into_idle_slot_starts_immediately() {
        let mut ctx = context();
        ctx.queue_project(EARTH, 0, DesignId(1), Some(10)).unwrap();
        ctx.queue_project(EARTH, 0, DesignId(2), None).unwrap();

        let slot = ctx.slot(EARTH, 0).unwrap();
        assert_eq!(slot.project().unwrap().design(), DesignId(1));
        assert_eq!(slot.project().unwrap().priority(), 10);
        assert_eq!(slot.queue_len(), 1);
    }

    #[test]
    fn test_queue_unknown_design_fails() {
        let mut ctx = context();
        assert!(matches!(
            ctx.queue_project(EARTH, 0, DesignId(77), None),
            Err(GameError::DesignNotFound(DesignId(77)))
        ));
        assert!(matches!(
            ctx.queue_project(EARTH, 5, DesignId(1), None),
            Err(GameError::SlotNotFound { slot: 5, .. })
        ));
        assert!(matches!(
            ctx.queue_project(ProductionCenterId(8), 0, DesignId(1), None),
            Err(GameError::ProductionCenterNotFound(_))
        ));
    }

    #[test]
    fn test_start_project_replaces() {
        let mut ctx = context();
        assert!(ctx.start_project(EARTH, 1, DesignId(1)).unwrap().is_none());
        let replaced = ctx.start_project(EARTH, 1, DesignId(2)).unwrap();
        assert_eq!(replaced.unwrap().design(), DesignId(1));
        assert!(ctx.start_project(EARTH, 1, DesignId(99)).is_err());
    }

    #[test]
    fn test_project_commands_on_idle_slot() {
        let mut ctx = context();
        assert!(!ctx.cancel_project(EARTH, 0).unwrap());
        assert!(!ctx.pause_project(EARTH, 0).unwrap());
        assert!(ctx.rush_project(EARTH, 7).is_err());
    }

    #[test]
    fn test_observers_see_priority_changes() {
        let mut ctx = context();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = ctx.subscribe(move |change| sink.lock().unwrap().push(*change));

        ctx.set_slot_priority(EARTH, 1, 999).unwrap();
        assert_eq!(ctx.slot(EARTH, 1).unwrap().priority(), 255);

        ctx.start_project(EARTH, 0, DesignId(1)).unwrap();
        assert!(ctx.set_project_priority(EARTH, 0, -4).unwrap());
        assert_eq!(ctx.project(EARTH, 0).unwrap().unwrap().priority(), 0);

        let seen_now: Vec<_> = seen.lock().unwrap().iter().map(|c| (c.slot, c.property)).collect();
        assert_eq!(
            seen_now,
            vec![
                (1, Property::Priority),
                (0, Property::Project),
                (0, Property::HasProject),
                (0, Property::Priority),
            ]
        );

        assert!(ctx.unsubscribe(id));
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut a = context();
        let b = context();
        assert_eq!(a.state_hash(), b.state_hash());

        a.queue_project(EARTH, 0, DesignId(1), None).unwrap();
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut ctx = context();
        ctx.queue_project(EARTH, 0, DesignId(1), None).unwrap();
        ctx.queue_project(EARTH, 0, DesignId(2), Some(200)).unwrap();
        ctx.process_turn();

        let restored = GameContext::load(&ctx.save().unwrap()).unwrap();
        assert_eq!(restored.turn(), ctx.turn());
        assert_eq!(restored.state_hash(), ctx.state_hash());
        assert_eq!(restored.slot(EARTH, 0).unwrap(), ctx.slot(EARTH, 0).unwrap());
    }
}
