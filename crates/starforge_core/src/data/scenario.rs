//! Scenario files: a complete starting position for the construction model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::design_data::build_registry;
use super::{parse_ron, read_ron, DesignData, ResourceAmounts};
use crate::center::ProductionCenter;
use crate::civilization::Civilization;
use crate::components::{CivId, MapLocation, ProductionCenterId};
use crate::config::BuildRules;
use crate::context::GameContext;
use crate::error::{GameError, Result};
use crate::slot::BuildSlot;

/// A civilization taking part in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilizationData {
    /// Unique numeric identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Starting treasury.
    #[serde(default)]
    pub credits: i64,
    /// Spare energy for new structures.
    #[serde(default)]
    pub energy_surplus: i32,
}

/// A build slot and the designs waiting in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    /// Slot priority. Falls back to the rules' default slot priority.
    #[serde(default)]
    pub priority: Option<u8>,
    /// Design names to build, in order. The first one starts right away.
    #[serde(default)]
    pub queue: Vec<String>,
}

/// A production center with its slots.
///
/// # Example RON
///
/// ```ron
/// CenterData(
///     id: 1,
///     name: "Earth",
///     owner: 1,
///     location: (4, 5),
///     industry: 30,
///     resources: (raw_materials: 10),
///     slots: [(queue: ["Frigate"])],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterData {
    /// Unique numeric identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Owning civilization id.
    pub owner: u32,
    /// Sector coordinates.
    pub location: (u8, u8),
    /// Industry produced every turn.
    pub industry: i32,
    /// Resources produced every turn.
    #[serde(default)]
    pub resources: ResourceAmounts,
    /// Build slots.
    #[serde(default)]
    pub slots: Vec<SlotData>,
}

/// A complete scenario definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Construction rules.
    #[serde(default)]
    pub rules: BuildRules,
    /// Every buildable design.
    pub designs: Vec<DesignData>,
    /// Participating civilizations.
    pub civilizations: Vec<CivilizationData>,
    /// Production centers.
    pub centers: Vec<CenterData>,
}

impl Scenario {
    /// Parse a scenario from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        parse_ron(source, "<inline>")
    }

    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        read_ron(path)
    }

    /// Build a ready-to-run context.
    ///
    /// # Errors
    ///
    /// Fails if the rules or a design are invalid, a center names an unknown
    /// owner or a slot queues an unknown design.
    pub fn build(&self) -> Result<GameContext> {
        let rules = self.rules.checked("scenario")?;
        let designs = build_registry(&self.designs, "scenario")?;
        let mut ctx = GameContext::new(rules, designs);

        for civ in &self.civilizations {
            ctx.add_civilization(
                Civilization::new(CivId(civ.id), civ.name.clone())
                    .with_credits(civ.credits)
                    .with_energy_surplus(civ.energy_surplus),
            );
        }

        for data in &self.centers {
            let id = ProductionCenterId(data.id);
            let mut center = ProductionCenter::new(
                id,
                data.name.clone(),
                CivId(data.owner),
                MapLocation::new(data.location.0, data.location.1),
            )
            .with_output(data.industry, data.resources.into());
            for slot in &data.slots {
                center.add_slot(BuildSlot::new(
                    slot.priority.unwrap_or(self.rules.default_slot_priority),
                ));
            }
            ctx.add_center(center)?;

            for (index, slot) in data.slots.iter().enumerate() {
                for name in &slot.queue {
                    let design = ctx.designs().find_by_name(name).map(|d| d.id).ok_or_else(|| {
                        GameError::InvalidArgument(format!(
                            "center '{}' queues unknown design '{name}'",
                            data.name
                        ))
                    })?;
                    ctx.queue_project(id, index, design, None)?;
                }
            }
        }

        tracing::info!(
            designs = self.designs.len(),
            civilizations = self.civilizations.len(),
            centers = self.centers.len(),
            "Scenario built"
        );
        Ok(ctx)
    }
}
