//! Build design data structures.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{parse_ron, read_ron};
use crate::components::DesignId;
use crate::design::{BuildDesign, DesignRegistry, ProjectKind};
use crate::error::{GameError, Result};
use crate::resources::ResourcePool;

/// Resource amounts as written in data files. Missing entries are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceAmounts {
    /// Deuterium.
    pub deuterium: i32,
    /// Dilithium.
    pub dilithium: i32,
    /// Raw materials.
    pub raw_materials: i32,
}

impl From<ResourceAmounts> for ResourcePool {
    fn from(amounts: ResourceAmounts) -> Self {
        Self::new(amounts.deuterium, amounts.dilithium, amounts.raw_materials)
    }
}

/// Data-driven design definition.
///
/// # Example RON
///
/// ```ron
/// DesignData(
///     id: 10,
///     name: "Frigate",
///     kind: Ship,
///     industry: 100,
///     resources: (raw_materials: 40),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignData {
    /// Unique numeric identifier.
    pub id: u32,

    /// Display name, also used by scenarios to refer to the design.
    pub name: String,

    /// Project kind that constructs this design.
    pub kind: ProjectKind,

    /// Total industry required.
    pub industry: i32,

    /// Total resources required.
    #[serde(default)]
    pub resources: ResourceAmounts,

    /// Energy drawn once online.
    #[serde(default)]
    pub energy_cost: i32,
}

impl DesignData {
    /// Validate the definition.
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(format!("Design {} has an empty name", self.id));
        }
        if self.industry < 0 {
            errors.push(format!(
                "Design '{}' has negative industry cost {}",
                self.name, self.industry
            ));
        }
        let resources = ResourcePool::from(self.resources);
        for (kind, amount) in resources.iter() {
            if amount < 0 {
                errors.push(format!(
                    "Design '{}' has negative {} cost {}",
                    self.name, kind, amount
                ));
            }
        }
        if self.energy_cost < 0 {
            errors.push(format!(
                "Design '{}' has negative energy cost {}",
                self.name, self.energy_cost
            ));
        }

        errors
    }

    /// Convert into a runtime design.
    #[must_use]
    pub fn to_design(&self) -> BuildDesign {
        BuildDesign::new(
            DesignId(self.id),
            self.name.clone(),
            self.kind,
            self.industry,
            self.resources.into(),
        )
        .with_energy_cost(self.energy_cost)
    }
}

/// Validate a list of definitions and build a registry from them.
pub(crate) fn build_registry(data: &[DesignData], origin: &str) -> Result<DesignRegistry> {
    let mut errors: Vec<String> = data.iter().flat_map(DesignData::validate).collect();

    let mut ids = BTreeSet::new();
    let mut names = BTreeSet::new();
    for design in data {
        if !ids.insert(design.id) {
            errors.push(format!("Duplicate design id {}", design.id));
        }
        if !names.insert(design.name.as_str()) {
            errors.push(format!("Duplicate design name '{}'", design.name));
        }
    }

    if !errors.is_empty() {
        return Err(GameError::DataParseError {
            path: origin.to_string(),
            message: errors.join("; "),
        });
    }

    let registry: DesignRegistry = data.iter().map(DesignData::to_design).collect();
    tracing::debug!(count = registry.len(), origin, "Loaded build designs");
    Ok(registry)
}

/// Parse and validate a RON list of designs.
///
/// # Errors
///
/// Returns [`GameError::DataParseError`] if parsing or validation fails.
pub fn load_designs_from_str(source: &str) -> Result<DesignRegistry> {
    let data: Vec<DesignData> = parse_ron(source, "<inline>")?;
    build_registry(&data, "<inline>")
}

/// Load and validate a RON file holding a list of designs.
///
/// # Errors
///
/// Returns [`GameError::DataParseError`] if reading, parsing or validation fails.
pub fn load_designs(path: &Path) -> Result<DesignRegistry> {
    let data: Vec<DesignData> = read_ron(path)?;
    build_registry(&data, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    const DESIGNS: &str = r#"[
        DesignData(
            id: 1,
            name: "Frigate",
            kind: Ship,
            industry: 100,
            resources: (raw_materials: 40),
        ),
        DesignData(
            id: 2,
            name: "Power Plant",
            kind: Building,
            industry: 50,
            resources: (deuterium: 12, dilithium: 5),
            energy_cost: 3,
        ),
    ]"#;

    #[test]
    fn test_load_designs_from_str() {
        let registry = load_designs_from_str(DESIGNS).unwrap();
        assert_eq!(registry.len(), 2);

        let frigate = registry.find_by_name("Frigate").unwrap();
        assert_eq!(frigate.id, DesignId(1));
        assert_eq!(frigate.resources_required[ResourceKind::RawMaterials], 40);
        assert_eq!(frigate.resources_required[ResourceKind::Deuterium], 0);

        let plant = registry.get(DesignId(2)).unwrap();
        assert_eq!(plant.kind, ProjectKind::Building);
        assert_eq!(plant.energy_cost, 3);
    }

    #[test]
    fn test_validation_errors() {
        let bad = DesignData {
            id: 4,
            name: " ".to_string(),
            kind: ProjectKind::Station,
            industry: -1,
            resources: ResourceAmounts {
                dilithium: -2,
                ..ResourceAmounts::default()
            },
            energy_cost: -3,
        };
        assert_eq!(bad.validate().len(), 4);
    }

    #[test]
    fn test_duplicates_rejected() {
        let source = r#"[
            DesignData(id: 1, name: "Scout", kind: Ship, industry: 10),
            DesignData(id: 1, name: "Scout", kind: Ship, industry: 20),
        ]"#;
        let Err(GameError::DataParseError { message, .. }) = load_designs_from_str(source) else {
            panic!("duplicates should be rejected");
        };
        assert!(message.contains("Duplicate design id 1"));
        assert!(message.contains("Duplicate design name 'Scout'"));
    }

    #[test]
    fn test_malformed_ron() {
        assert!(matches!(
            load_designs_from_str("[DesignData(id: 1"),
            Err(GameError::DataParseError { .. })
        ));
    }
}
