//! Situation-report entries produced by construction.

use serde::{Deserialize, Serialize};

use crate::components::{DesignId, MapLocation, ProductionCenterId};
use crate::resources::ResourceKind;

/// A turn-summary item shown to the owning player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SitRepEntry {
    /// A ship, station or battery left the slipway.
    ItemBuilt {
        /// Design that was built.
        design: DesignId,
        /// Display name of the design.
        name: String,
        /// Where it was built.
        location: MapLocation,
    },
    /// A planetary structure was finished.
    BuildingBuilt {
        /// Design that was built.
        design: DesignId,
        /// Display name of the design.
        name: String,
        /// Where it was built.
        location: MapLocation,
        /// Whether the structure came online immediately.
        active: bool,
    },
    /// A project cannot get enough of a resource in its final turn.
    ResourceShortage {
        /// Production center hosting the project.
        center: ProductionCenterId,
        /// Missing resource.
        resource: ResourceKind,
        /// How much is missing.
        shortfall: i32,
        /// Human-readable project description.
        project: String,
    },
}

impl SitRepEntry {
    /// One-line summary suitable for logs and the CLI.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::ItemBuilt { name, location, .. } => format!("{name} completed at {location}"),
            Self::BuildingBuilt {
                name,
                location,
                active,
                ..
            } => {
                let state = if *active { "online" } else { "offline" };
                format!("{name} constructed at {location} ({state})")
            }
            Self::ResourceShortage {
                resource,
                shortfall,
                project,
                ..
            } => format!("{project} is short {shortfall} {resource}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries() {
        let built = SitRepEntry::BuildingBuilt {
            design: DesignId(2),
            name: "Research Lab".into(),
            location: MapLocation::new(3, 4),
            active: false,
        };
        assert_eq!(built.summary(), "Research Lab constructed at (3, 4) (offline)");

        let short = SitRepEntry::ResourceShortage {
            center: ProductionCenterId(1),
            resource: ResourceKind::RawMaterials,
            shortfall: 7,
            project: "Frigate at (0, 0)".into(),
        };
        assert_eq!(short.summary(), "Frigate at (0, 0) is short 7 Raw Materials");
    }
}
