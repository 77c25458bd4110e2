//! Proptest strategies for construction testing.
//!
//! These strategies generate random but reproducible designs, budgets and
//! projects for property-based tests.

use proptest::prelude::*;
use starforge_core::prelude::*;

/// Generate a resource amount, occasionally zero.
pub fn arb_amount(max: i32) -> impl Strategy<Value = i32> {
    prop_oneof![1 => Just(0), 4 => 0..=max]
}

/// Generate a resource pool with every amount in `0..=max`.
pub fn arb_pool(max: i32) -> impl Strategy<Value = ResourcePool> {
    (arb_amount(max), arb_amount(max), arb_amount(max))
        .prop_map(|(d, di, rm)| ResourcePool::new(d, di, rm))
}

/// Generate a project kind.
pub fn arb_kind() -> impl Strategy<Value = ProjectKind> {
    prop_oneof![
        Just(ProjectKind::Building),
        Just(ProjectKind::ProductionFacility),
        Just(ProjectKind::Shipyard),
        Just(ProjectKind::Ship),
        Just(ProjectKind::Station),
        Just(ProjectKind::OrbitalBattery),
    ]
}

/// Generate a design with id 1.
pub fn arb_design() -> impl Strategy<Value = BuildDesign> {
    (arb_kind(), 0i32..2_000, arb_pool(500)).prop_map(|(kind, industry, resources)| {
        BuildDesign::new(DesignId(1), "Generated", kind, industry, resources)
    })
}

/// Generate a per-turn industry budget, including non-positive values.
pub fn arb_industry() -> impl Strategy<Value = i32> {
    prop_oneof![1 => -50i32..=0, 6 => 1i32..=300]
}

/// Generate a priority in the full clamping range.
pub fn arb_priority() -> impl Strategy<Value = i32> {
    -100i32..400
}

/// Generate a site.
pub fn arb_site() -> impl Strategy<Value = ProjectSite> {
    (1u32..5, 1u32..20, any::<u8>(), any::<u8>()).prop_map(|(owner, center, x, y)| ProjectSite {
        owner: CivId(owner),
        center: ProductionCenterId(center),
        location: MapLocation::new(x, y),
    })
}

/// A sequence of per-turn budgets.
pub fn arb_budgets(max_turns: usize) -> impl Strategy<Value = Vec<(i32, ResourcePool)>> {
    proptest::collection::vec((arb_industry(), arb_pool(120)), 1..max_turns)
}
