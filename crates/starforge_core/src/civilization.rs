//! Civilization bookkeeping touched by construction.
//!
//! Finishing a project hands control to a [`CivilizationManager`], which
//! decides whether the object can actually be placed and records the
//! resulting situation reports. [`CivilizationLedger`] is the in-memory
//! implementation used by [`GameContext`](crate::context::GameContext).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{CivId, DesignId, MapLocation, ObjectId};
use crate::design::BuildDesign;
use crate::sitrep::SitRepEntry;

/// An object placed in the world by a finished project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnedObject {
    /// New object identifier.
    pub id: ObjectId,
    /// Design it was built from.
    pub design: DesignId,
    /// Where it was placed.
    pub location: MapLocation,
    /// Whether it is operating right away.
    pub active: bool,
}

/// Receiver of construction results.
pub trait CivilizationManager {
    /// Place the finished object for `owner`.
    ///
    /// Returns `None` if the object could not be placed.
    fn try_spawn(
        &mut self,
        owner: CivId,
        design: &BuildDesign,
        location: MapLocation,
    ) -> Option<SpawnedObject>;

    /// Append a situation report for `owner`.
    fn append_sitrep(&mut self, owner: CivId, entry: SitRepEntry);
}

/// Per-civilization state kept by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Civilization {
    /// Civilization identifier.
    pub id: CivId,
    /// Display name.
    pub name: String,
    /// Treasury used to rush projects.
    pub credits: i64,
    /// Spare energy available to power new structures.
    pub energy_surplus: i32,
    /// Reports accumulated since the last [`Civilization::take_sitreps`].
    pub sitreps: Vec<SitRepEntry>,
    /// Every object this civilization has built.
    pub objects: Vec<SpawnedObject>,
}

impl Civilization {
    /// Create a civilization with an empty treasury.
    #[must_use]
    pub fn new(id: CivId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            credits: 0,
            energy_surplus: 0,
            sitreps: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Set the starting treasury.
    #[must_use]
    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = credits;
        self
    }

    /// Set the spare energy.
    #[must_use]
    pub fn with_energy_surplus(mut self, energy: i32) -> Self {
        self.energy_surplus = energy;
        self
    }

    /// Drain the accumulated situation reports.
    pub fn take_sitreps(&mut self) -> Vec<SitRepEntry> {
        std::mem::take(&mut self.sitreps)
    }
}

/// In-memory civilization registry with an object-owner reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilizationLedger {
    civilizations: BTreeMap<CivId, Civilization>,
    owners: BTreeMap<ObjectId, CivId>,
    next_object_id: ObjectId,
}

impl CivilizationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            civilizations: BTreeMap::new(),
            owners: BTreeMap::new(),
            next_object_id: 1,
        }
    }

    /// Register a civilization, replacing any previous one with the same id.
    pub fn insert(&mut self, civilization: Civilization) {
        self.civilizations.insert(civilization.id, civilization);
    }

    /// Get a civilization by ID.
    #[must_use]
    pub fn get(&self, id: CivId) -> Option<&Civilization> {
        self.civilizations.get(&id)
    }

    /// Get a mutable civilization by ID.
    pub fn get_mut(&mut self, id: CivId) -> Option<&mut Civilization> {
        self.civilizations.get_mut(&id)
    }

    /// Check if a civilization is registered.
    #[must_use]
    pub fn contains(&self, id: CivId) -> bool {
        self.civilizations.contains_key(&id)
    }

    /// All civilizations in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Civilization> {
        self.civilizations.values()
    }

    /// Owner of a spawned object.
    #[must_use]
    pub fn owner_of(&self, object: ObjectId) -> Option<CivId> {
        self.owners.get(&object).copied()
    }

    /// Spend credits if the treasury holds enough.
    ///
    /// Returns true if the transaction succeeded. Negative amounts are
    /// refused.
    pub fn spend_credits(&mut self, id: CivId, amount: i64) -> bool {
        if amount < 0 {
            return false;
        }
        match self.civilizations.get_mut(&id) {
            Some(civ) if civ.credits >= amount => {
                civ.credits -= amount;
                true
            }
            _ => false,
        }
    }
}

impl Default for CivilizationLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CivilizationManager for CivilizationLedger {
    fn try_spawn(
        &mut self,
        owner: CivId,
        design: &BuildDesign,
        location: MapLocation,
    ) -> Option<SpawnedObject> {
        let civ = self.civilizations.get_mut(&owner)?;

        // Structures only come online if there is spare energy to run them.
        let active = if design.kind.is_structure() && design.energy_cost > 0 {
            if civ.energy_surplus >= design.energy_cost {
                civ.energy_surplus -= design.energy_cost;
                true
            } else {
                false
            }
        } else {
            true
        };

        let id = self.next_object_id;
        self.next_object_id += 1;

        let object = SpawnedObject {
            id,
            design: design.id,
            location,
            active,
        };
        civ.objects.push(object);
        self.owners.insert(id, owner);
        Some(object)
    }

    fn append_sitrep(&mut self, owner: CivId, entry: SitRepEntry) {
        match self.civilizations.get_mut(&owner) {
            Some(civ) => civ.sitreps.push(entry),
            None => tracing::warn!(?owner, "Dropping sit-rep for unknown civilization"),
        }
    }
}
