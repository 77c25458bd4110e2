//! Test fixtures and helpers.
//!
//! Pre-built designs and game contexts for consistent testing.

use starforge_core::prelude::*;

/// Owner of every fixture center.
pub const FEDERATION: CivId = CivId(1);
/// Second civilization, owns [`QONOS`].
pub const KLINGONS: CivId = CivId(2);

/// Home world of [`FEDERATION`]: two slots, 30 industry, 10 raw materials.
pub const EARTH: ProductionCenterId = ProductionCenterId(1);
/// Home world of [`KLINGONS`]: one slot, 50 industry, mixed resources.
pub const QONOS: ProductionCenterId = ProductionCenterId(2);

/// Frigate: ship, 100 industry, 40 raw materials.
pub const FRIGATE: DesignId = DesignId(1);
/// Power plant: building, 50 industry, 12 deuterium, 5 dilithium, draws 3 energy.
pub const POWER_PLANT: DesignId = DesignId(2);
/// Research lab: building, 90 industry, no resources.
pub const RESEARCH_LAB: DesignId = DesignId(3);
/// Starbase: station, 400 industry, heavy on everything.
pub const STARBASE: DesignId = DesignId(4);

/// The fixture designs.
#[must_use]
pub fn sample_designs() -> DesignRegistry {
    [
        BuildDesign::new(
            FRIGATE,
            "Frigate",
            ProjectKind::Ship,
            100,
            ResourcePool::single(ResourceKind::RawMaterials, 40),
        ),
        BuildDesign::new(
            POWER_PLANT,
            "Power Plant",
            ProjectKind::Building,
            50,
            ResourcePool::new(12, 5, 0),
        )
        .with_energy_cost(3),
        BuildDesign::new(
            RESEARCH_LAB,
            "Research Lab",
            ProjectKind::Building,
            90,
            ResourcePool::ZERO,
        ),
        BuildDesign::new(
            STARBASE,
            "Starbase",
            ProjectKind::Station,
            400,
            ResourcePool::new(60, 30, 200),
        ),
    ]
    .into_iter()
    .collect()
}

/// A site at [`EARTH`].
#[must_use]
pub fn earth_site() -> ProjectSite {
    ProjectSite {
        owner: FEDERATION,
        center: EARTH,
        location: MapLocation::new(4, 5),
    }
}

/// Two civilizations with one home world each, slots idle.
#[must_use]
pub fn sample_context(rules: BuildRules) -> GameContext {
    let mut ctx = GameContext::new(rules, sample_designs());
    ctx.add_civilization(Civilization::new(FEDERATION, "Federation").with_credits(1_000));
    ctx.add_civilization(
        Civilization::new(KLINGONS, "Klingon Empire")
            .with_credits(200)
            .with_energy_surplus(2),
    );

    let centers = [
        ProductionCenter::new(EARTH, "Earth", FEDERATION, MapLocation::new(4, 5))
            .with_output(30, ResourcePool::single(ResourceKind::RawMaterials, 10))
            .with_slots(2, rules.default_slot_priority),
        ProductionCenter::new(QONOS, "Qo'noS", KLINGONS, MapLocation::new(20, 3))
            .with_output(50, ResourcePool::new(8, 4, 25))
            .with_slots(1, rules.default_slot_priority),
    ];
    for center in centers {
        if let Err(e) = ctx.add_center(center) {
            panic!("fixture center rejected: {e}");
        }
    }
    ctx
}

/// [`sample_context`] with work queued in every slot.
///
/// Earth builds frigates in slot 0 and a lab then a power plant in slot 1;
/// Qo'noS builds a starbase followed by a frigate.
#[must_use]
pub fn busy_context(rules: BuildRules) -> GameContext {
    let mut ctx = sample_context(rules);
    let orders = [
        (EARTH, 0, FRIGATE),
        (EARTH, 0, FRIGATE),
        (EARTH, 1, RESEARCH_LAB),
        (EARTH, 1, POWER_PLANT),
        (QONOS, 0, STARBASE),
        (QONOS, 0, FRIGATE),
    ];
    for (center, slot, design) in orders {
        if let Err(e) = ctx.queue_project(center, slot, design, None) {
            panic!("fixture order rejected: {e}");
        }
    }
    ctx
}
