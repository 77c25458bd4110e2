//! Build projects: the per-project construction accounting.
//!
//! A project records how much industry and which resources have been sunk
//! into a design at a production center. Requirements are never stored on
//! the project; they are read from the [`BuildDesign`] on demand.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::components::{CivId, DesignId, MapLocation, ProductionCenterId};
use crate::config::{BuildRules, CompletionPolicy};
use crate::design::{BuildDesign, DesignLookup, ProjectKind};
use crate::error::{GameError, Result};
use crate::math::{ceil_div, ratio, Fixed};
use crate::resources::{ResourceKind, ResourcePool};

bitflags! {
    /// Status bits of a build project.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BuildProjectFlags: u8 {
        /// Paused by the player. Ignored once cancelled.
        const ON_HOLD                = 1 << 0;
        /// Cancelled; the slot drops it at turn end.
        const CANCELLED              = 1 << 1;
        /// Remaining industry will be bought with credits.
        const RUSHED                 = 1 << 2;
        /// Not enough deuterium to finish on the estimated final turn.
        const DEUTERIUM_SHORTAGE     = 1 << 3;
        /// Not enough dilithium to finish on the estimated final turn.
        const DILITHIUM_SHORTAGE     = 1 << 4;
        /// Not enough raw materials to finish on the estimated final turn.
        const RAW_MATERIALS_SHORTAGE = 1 << 5;
    }
}

impl BuildProjectFlags {
    /// Every shortage bit.
    pub const SHORTAGES: Self = Self::DEUTERIUM_SHORTAGE
        .union(Self::DILITHIUM_SHORTAGE)
        .union(Self::RAW_MATERIALS_SHORTAGE);

    /// Shortage bit for a resource.
    #[must_use]
    pub const fn shortage_for(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Deuterium => Self::DEUTERIUM_SHORTAGE,
            ResourceKind::Dilithium => Self::DILITHIUM_SHORTAGE,
            ResourceKind::RawMaterials => Self::RAW_MATERIALS_SHORTAGE,
        }
    }
}

/// Where a project is being built and for whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectSite {
    /// Owning civilization.
    pub owner: CivId,
    /// Hosting production center.
    pub center: ProductionCenterId,
    /// Sector of the production center.
    pub location: MapLocation,
}

/// Construction progress of one design at one production center.
///
/// Field order is the persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildProject {
    design: DesignId,
    industry_invested: i32,
    location: MapLocation,
    owner: CivId,
    priority: u8,
    resources_invested: ResourcePool,
    flags: BuildProjectFlags,
    kind: ProjectKind,
    production_center: ProductionCenterId,
}

impl BuildProject {
    /// Start a fresh project for `design`.
    #[must_use]
    pub fn new(design: &BuildDesign, site: ProjectSite, priority: u8) -> Self {
        Self::fresh(design.kind, design.id, site, priority)
    }

    /// Start a fresh project after checking the design exists.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] if `design` is not in `designs`.
    pub fn create(
        designs: &dyn DesignLookup,
        design: DesignId,
        site: ProjectSite,
        rules: &BuildRules,
    ) -> Result<Self> {
        let design = designs.build_design(design).ok_or_else(|| {
            GameError::InvalidArgument(format!("cannot build unknown design {design:?}"))
        })?;
        Ok(Self::new(design, site, rules.default_project_priority))
    }

    pub(crate) fn fresh(kind: ProjectKind, design: DesignId, site: ProjectSite, priority: u8) -> Self {
        Self {
            design,
            industry_invested: 0,
            location: site.location,
            owner: site.owner,
            priority,
            resources_invested: ResourcePool::ZERO,
            flags: BuildProjectFlags::empty(),
            kind,
            production_center: site.center,
        }
    }

    /// Design being built.
    #[must_use]
    pub const fn design(&self) -> DesignId {
        self.design
    }

    /// Concrete project kind.
    #[must_use]
    pub const fn kind(&self) -> ProjectKind {
        self.kind
    }

    /// Owning civilization.
    #[must_use]
    pub const fn owner(&self) -> CivId {
        self.owner
    }

    /// Hosting production center.
    #[must_use]
    pub const fn production_center(&self) -> ProductionCenterId {
        self.production_center
    }

    /// Build location.
    #[must_use]
    pub const fn location(&self) -> MapLocation {
        self.location
    }

    /// Site triple of this project.
    #[must_use]
    pub const fn site(&self) -> ProjectSite {
        ProjectSite {
            owner: self.owner,
            center: self.production_center,
            location: self.location,
        }
    }

    /// Industry sunk so far.
    #[must_use]
    pub const fn industry_invested(&self) -> i32 {
        self.industry_invested
    }

    /// Resources sunk so far.
    #[must_use]
    pub const fn resources_invested(&self) -> &ResourcePool {
        &self.resources_invested
    }

    /// Scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Raw status bits.
    #[must_use]
    pub const fn flags(&self) -> BuildProjectFlags {
        self.flags
    }

    /// Set the priority, clamped to `0..=255`.
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority.clamp(0, i32::from(u8::MAX)) as u8;
    }

    /// Cancel the project. Irreversible.
    pub fn cancel(&mut self) {
        self.flags.insert(BuildProjectFlags::CANCELLED);
    }

    /// Put the project on hold. No effect once cancelled.
    pub fn pause(&mut self) {
        if !self.is_cancelled() {
            self.flags.insert(BuildProjectFlags::ON_HOLD);
        }
    }

    /// Take the project off hold. No effect once cancelled.
    pub fn resume(&mut self) {
        if !self.is_cancelled() {
            self.flags.remove(BuildProjectFlags::ON_HOLD);
        }
    }

    /// Ask for the remaining industry to be bought outright.
    pub fn rush(&mut self) {
        if !self.is_cancelled() {
            self.flags.insert(BuildProjectFlags::RUSHED);
        }
    }

    /// Check if the project is cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.flags.contains(BuildProjectFlags::CANCELLED)
    }

    /// Check if the project is on hold.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.flags.contains(BuildProjectFlags::ON_HOLD) && !self.is_cancelled()
    }

    /// Check if the project is waiting to be rushed.
    #[must_use]
    pub const fn is_rushed(&self) -> bool {
        self.flags.contains(BuildProjectFlags::RUSHED)
    }

    /// Check if the last advance flagged a shortage of `kind`.
    #[must_use]
    pub const fn has_shortage(&self, kind: ResourceKind) -> bool {
        self.flags.contains(BuildProjectFlags::shortage_for(kind))
    }

    /// Industry still needed to meet `design`.
    #[must_use]
    pub fn industry_remaining(&self, design: &BuildDesign) -> i32 {
        (design.industry_required - self.industry_invested).max(0)
    }

    /// Resources still needed to meet `design`.
    #[must_use]
    pub fn resources_remaining(&self, design: &BuildDesign) -> ResourcePool {
        design.resources_required.saturating_sub(&self.resources_invested)
    }

    /// Industry invested as a fraction of the requirement.
    #[must_use]
    pub fn percent_complete(&self, design: &BuildDesign) -> Fixed {
        ratio(self.industry_invested, design.industry_required)
    }

    /// Check if the project is finished under `policy`.
    #[must_use]
    pub fn is_completed(&self, design: &BuildDesign, policy: CompletionPolicy) -> bool {
        let industry_met = self.industry_invested >= design.industry_required;
        match policy {
            CompletionPolicy::IndustryOnly => industry_met,
            CompletionPolicy::RequireResources => {
                industry_met && self.resources_invested.covers(&design.resources_required)
            }
        }
    }

    /// Check if some progress was made but the project is not finished.
    #[must_use]
    pub fn is_partially_complete(&self, design: &BuildDesign, policy: CompletionPolicy) -> bool {
        let started = self.industry_invested > 0 || !self.resources_invested.is_empty();
        started && !self.is_completed(design, policy)
    }

    /// Turns left at `industry_per_turn`; at least one turn is assumed per turn.
    #[must_use]
    pub fn turns_remaining(&self, design: &BuildDesign, industry_per_turn: i32) -> u32 {
        ceil_div(self.industry_remaining(design), industry_per_turn) as u32
    }

    /// Same concrete kind building the same design.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.kind == other.kind && self.design == other.design
    }

    /// A fresh, zero-progress project of the same kind and design.
    #[must_use]
    pub fn clone_equivalent(&self) -> Self {
        Self::fresh(self.kind, self.design, self.site(), self.priority)
    }

    /// Text used in situation reports.
    #[must_use]
    pub fn description(&self, design: &BuildDesign) -> String {
        format!("{} ({}) at {}", design.name, self.kind.short_name(), self.location)
    }

    pub(crate) fn invest_industry(&mut self, amount: i32) {
        self.industry_invested = self.industry_invested.saturating_add(amount.max(0));
    }

    pub(crate) fn invest_resource(&mut self, kind: ResourceKind, amount: i32) {
        self.resources_invested.add(kind, amount.max(0));
    }

    pub(crate) fn clear_shortages(&mut self) {
        self.flags.remove(BuildProjectFlags::SHORTAGES);
    }

    pub(crate) fn flag_shortage(&mut self, kind: ResourceKind) {
        self.flags.insert(BuildProjectFlags::shortage_for(kind));
    }

    pub(crate) fn clear_rush(&mut self) {
        self.flags.remove(BuildProjectFlags::RUSHED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frigate() -> BuildDesign {
        BuildDesign::new(
            DesignId(7),
            "Frigate",
            ProjectKind::Ship,
            100,
            ResourcePool::single(ResourceKind::RawMaterials, 40),
        )
    }

    fn site() -> ProjectSite {
        ProjectSite {
            owner: CivId(1),
            center: ProductionCenterId(3),
            location: MapLocation::new(4, 5),
        }
    }

    #[test]
    fn test_new_project_is_blank() {
        let project = BuildProject::new(&frigate(), site(), BuildRules::NORMAL_PRIORITY);
        assert_eq!(project.industry_invested(), 0);
        assert_eq!(*project.resources_invested(), ResourcePool::ZERO);
        assert_eq!(project.flags(), BuildProjectFlags::empty());
        assert_eq!(project.priority(), BuildRules::NORMAL_PRIORITY);
        assert_eq!(project.kind(), ProjectKind::Ship);
        assert_eq!(project.site(), site());
    }

    #[test]
    fn test_create_rejects_unknown_design() {
        let designs: crate::design::DesignRegistry = [frigate()].into_iter().collect();
        let rules = BuildRules::default();
        assert!(BuildProject::create(&designs, DesignId(7), site(), &rules).is_ok());
        let err = BuildProject::create(&designs, DesignId(8), site(), &rules).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
    }

    #[test]
    fn test_priority_clamps() {
        let mut project = BuildProject::new(&frigate(), site(), 0);
        project.set_priority(300);
        assert_eq!(project.priority(), 255);
        project.set_priority(-10);
        assert_eq!(project.priority(), 0);
        project.set_priority(42);
        assert_eq!(project.priority(), 42);
    }

    #[test]
    fn test_cancel_is_idempotent_and_final() {
        let mut project = BuildProject::new(&frigate(), site(), 0);
        project.cancel();
        project.cancel();
        assert!(project.is_cancelled());

        project.resume();
        assert!(project.is_cancelled());

        // Hold has no meaning once cancelled.
        project.pause();
        assert!(!project.is_paused());
    }

    #[test]
    fn test_pause_resume() {
        let mut project = BuildProject::new(&frigate(), site(), 0);
        project.pause();
        assert!(project.is_paused());
        project.resume();
        assert!(!project.is_paused());
    }

    #[test]
    fn test_cancel_after_pause_overrides_hold() {
        let mut project = BuildProject::new(&frigate(), site(), 0);
        project.pause();
        project.cancel();
        assert!(project.is_cancelled());
        assert!(!project.is_paused());
    }

    #[test]
    fn test_shortage_mapping_is_distinct() {
        let bits: Vec<_> = ResourceKind::ALL
            .iter()
            .map(|&k| BuildProjectFlags::shortage_for(k))
            .collect();
        assert_eq!(bits.len(), 3);
        assert_ne!(bits[0], bits[1]);
        assert_ne!(bits[1], bits[2]);
        assert_eq!(bits[0] | bits[1] | bits[2], BuildProjectFlags::SHORTAGES);
        assert!(!BuildProjectFlags::SHORTAGES.intersects(
            BuildProjectFlags::ON_HOLD | BuildProjectFlags::CANCELLED | BuildProjectFlags::RUSHED
        ));
    }

    #[test]
    fn test_completion_policies() {
        let design = frigate();
        let mut project = BuildProject::new(&design, site(), 0);
        project.invest_industry(100);
        project.invest_resource(ResourceKind::RawMaterials, 10);

        assert!(project.is_completed(&design, CompletionPolicy::IndustryOnly));
        assert!(!project.is_completed(&design, CompletionPolicy::RequireResources));
        assert!(project.is_partially_complete(&design, CompletionPolicy::RequireResources));
        assert!(!project.is_partially_complete(&design, CompletionPolicy::IndustryOnly));

        project.invest_resource(ResourceKind::RawMaterials, 30);
        assert!(project.is_completed(&design, CompletionPolicy::RequireResources));
    }

    #[test]
    fn test_progress_queries() {
        let design = frigate();
        let mut project = BuildProject::new(&design, site(), 0);
        assert_eq!(project.turns_remaining(&design, 30), 4);
        assert_eq!(project.turns_remaining(&design, 0), 100);

        project.invest_industry(25);
        assert_eq!(project.percent_complete(&design), Fixed::from_num(1) / Fixed::from_num(4));
        assert_eq!(project.industry_remaining(&design), 75);
        assert_eq!(
            project.resources_remaining(&design),
            ResourcePool::single(ResourceKind::RawMaterials, 40)
        );

        // Negative investments are ignored.
        project.invest_industry(-10);
        assert_eq!(project.industry_invested(), 25);
    }

    #[test]
    fn test_equivalence_and_clone() {
        let design = frigate();
        let mut project = BuildProject::new(&design, site(), 77);
        project.invest_industry(50);
        project.rush();

        let copy = project.clone_equivalent();
        assert!(copy.is_equivalent(&project));
        assert_eq!(copy.industry_invested(), 0);
        assert_eq!(copy.flags(), BuildProjectFlags::empty());
        assert_eq!(copy.priority(), 77);

        let other = BuildProject::fresh(ProjectKind::Station, DesignId(7), site(), 0);
        assert!(!other.is_equivalent(&project));
    }

    #[test]
    fn test_description() {
        let design = frigate();
        let project = BuildProject::new(&design, site(), 0);
        assert_eq!(project.description(&design), "Frigate (ship) at (4, 5)");
    }
}
