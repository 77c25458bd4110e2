//! Build designs and the design lookup seam.
//!
//! A design is the static recipe for something a civilization can build:
//! how much industry and which resources it consumes, and what kind of
//! project carries it through construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::DesignId;
use crate::resources::ResourcePool;

/// The closed set of concrete project kinds.
///
/// Each variant supplies its own behavior wherever projects differ
/// (cloning, completion reports), always through exhaustive matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    /// Planetary building (research lab, power plant, ...).
    Building,
    /// Industry/food/energy facility counted per colony.
    ProductionFacility,
    /// Orbital shipyard.
    Shipyard,
    /// Starship hull.
    Ship,
    /// Space station.
    Station,
    /// Orbital defence battery.
    OrbitalBattery,
}

impl ProjectKind {
    /// Whether the finished object is a planetary structure.
    ///
    /// Structures are reported as buildings (with an online flag) rather than
    /// as generic built items.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        match self {
            Self::Building | Self::ProductionFacility | Self::Shipyard => true,
            Self::Ship | Self::Station | Self::OrbitalBattery => false,
        }
    }

    /// Short name for logs and reports.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::ProductionFacility => "facility",
            Self::Shipyard => "shipyard",
            Self::Ship => "ship",
            Self::Station => "station",
            Self::OrbitalBattery => "orbital battery",
        }
    }
}

/// Static definition of something buildable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDesign {
    /// Unique identifier for this design.
    pub id: DesignId,
    /// Display name of the design.
    pub name: String,
    /// Project kind that constructs this design.
    pub kind: ProjectKind,
    /// Total industry needed to finish.
    pub industry_required: i32,
    /// Total resources needed to finish.
    pub resources_required: ResourcePool,
    /// Energy drawn once the object is online (structures only).
    pub energy_cost: i32,
}

impl BuildDesign {
    /// Create a new design.
    #[must_use]
    pub fn new(
        id: DesignId,
        name: impl Into<String>,
        kind: ProjectKind,
        industry_required: i32,
        resources_required: ResourcePool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            industry_required,
            resources_required,
            energy_cost: 0,
        }
    }

    /// Set the energy drawn once online.
    #[must_use]
    pub fn with_energy_cost(mut self, energy_cost: i32) -> Self {
        self.energy_cost = energy_cost;
        self
    }
}

/// Read access to the tech database.
///
/// The core only ever asks for designs by id; where they come from is the
/// caller's business.
pub trait DesignLookup {
    /// Get the design registered under `id`, if any.
    fn build_design(&self, id: DesignId) -> Option<&BuildDesign>;
}

/// Registry containing every known build design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignRegistry {
    designs: BTreeMap<DesignId, BuildDesign>,
}

impl DesignRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            designs: BTreeMap::new(),
        }
    }

    /// Register a design, replacing any previous one with the same id.
    pub fn register(&mut self, design: BuildDesign) {
        self.designs.insert(design.id, design);
    }

    /// Get a design by ID.
    #[must_use]
    pub fn get(&self, id: DesignId) -> Option<&BuildDesign> {
        self.designs.get(&id)
    }

    /// Find a design by display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&BuildDesign> {
        self.designs.values().find(|d| d.name == name)
    }

    /// All designs in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BuildDesign> {
        self.designs.values()
    }

    /// Number of registered designs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.designs.len()
    }

    /// Check if no designs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}

impl DesignLookup for DesignRegistry {
    fn build_design(&self, id: DesignId) -> Option<&BuildDesign> {
        self.get(id)
    }
}

impl FromIterator<BuildDesign> for DesignRegistry {
    fn from_iter<I: IntoIterator<Item = BuildDesign>>(iter: I) -> Self {
        let mut registry = Self::new();
        for design in iter {
            registry.register(design);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    fn registry() -> DesignRegistry {
        [
            BuildDesign::new(
                DesignId(1),
                "Scout",
                ProjectKind::Ship,
                80,
                ResourcePool::single(ResourceKind::Deuterium, 20),
            ),
            BuildDesign::new(
                DesignId(2),
                "Research Lab",
                ProjectKind::Building,
                150,
                ResourcePool::ZERO,
            )
            .with_energy_cost(5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_registry_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.build_design(DesignId(1)).unwrap().name, "Scout");
        assert!(registry.build_design(DesignId(99)).is_none());
        assert_eq!(registry.find_by_name("Research Lab").unwrap().id, DesignId(2));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = registry();
        registry.register(BuildDesign::new(
            DesignId(1),
            "Heavy Scout",
            ProjectKind::Ship,
            120,
            ResourcePool::ZERO,
        ));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(DesignId(1)).unwrap().industry_required, 120);
    }

    #[test]
    fn test_structure_kinds() {
        assert!(ProjectKind::Building.is_structure());
        assert!(ProjectKind::Shipyard.is_structure());
        assert!(!ProjectKind::Ship.is_structure());
        assert!(!ProjectKind::OrbitalBattery.is_structure());
    }
}
