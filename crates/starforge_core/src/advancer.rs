//! Per-turn advancement of a single build project.
//!
//! [`advance`] pours a production center's spare industry and resources into
//! one project. The caller passes the available amounts by `&mut` and the
//! advancer draws them down, so several projects at the same center can be
//! advanced one after another from the same budget.
//!
//! # Resource spreading
//!
//! Resources are not dumped into a project as fast as supply allows. The
//! outstanding requirement is spread over the estimated number of turns left,
//! with the division remainder paid up front:
//!
//! ```text
//! per_turn = remaining / turns + remaining % turns
//! ```
//!
//! Paying the remainder early means the requirement always reaches exactly
//! zero on the estimated final turn, with no one-unit residue left over from
//! integer truncation.

use serde::{Deserialize, Serialize};

use crate::civilization::{CivilizationManager, SpawnedObject};
use crate::config::BuildRules;
use crate::design::{BuildDesign, DesignLookup};
use crate::math::ceil_div;
use crate::notify::Property;
use crate::project::BuildProject;
use crate::resources::{ResourceKind, ResourcePool};
use crate::sitrep::SitRepEntry;

/// What happened to a project during one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    /// On hold or cancelled; nothing was touched.
    Skipped,
    /// The design is not in the tech database; nothing was touched.
    DesignMissing,
    /// Progress was made but the project is not finished.
    InProgress,
    /// The project finished this turn.
    Completed {
        /// The object placed in the world, if placement succeeded.
        spawned: Option<SpawnedObject>,
    },
}

/// A resource the project cannot get enough of on its final turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceShortage {
    /// Missing resource.
    pub kind: ResourceKind,
    /// Requirement left minus supply available.
    pub shortfall: i32,
}

/// Everything an advance did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceReport {
    /// Result of the advance.
    pub outcome: AdvanceOutcome,
    /// Turn estimate used for spreading resources.
    pub time_estimate: i32,
    /// Industry moved into the project.
    pub industry_spent: i32,
    /// Resources moved into the project.
    pub resources_spent: ResourcePool,
    /// Shortages detected on the estimated final turn.
    pub shortages: Vec<ResourceShortage>,
    /// Turn estimate after this advance, at the same industry rate.
    pub turns_remaining: u32,
    /// Properties that changed.
    pub changes: Vec<Property>,
}

impl AdvanceReport {
    fn untouched(outcome: AdvanceOutcome) -> Self {
        Self {
            outcome,
            time_estimate: 0,
            industry_spent: 0,
            resources_spent: ResourcePool::ZERO,
            shortages: Vec::new(),
            turns_remaining: 0,
            changes: Vec::new(),
        }
    }

    /// Check if the project finished during this advance.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.outcome, AdvanceOutcome::Completed { .. })
    }
}

/// Number of turns the project needs at `available_industry`, counting this one.
///
/// Returns 1 when the industry requirement is already met.
#[must_use]
pub fn time_estimate(project: &BuildProject, design: &BuildDesign, available_industry: i32) -> i32 {
    let remaining = design.industry_required - project.industry_invested();
    if remaining <= 0 {
        return 1;
    }
    ceil_div(remaining, available_industry.max(1)).max(1)
}

/// Advance `project` by one turn.
///
/// Draws industry and resources out of `available_industry` and
/// `available_resources`. Paused and cancelled projects, and projects whose
/// design cannot be found, leave every argument untouched.
///
/// When the project finishes, `civ` is asked to place the object and a
/// situation report is appended for the owner.
///
/// There is no guard against advancing an already finished project: each
/// call places the object again. Callers retire finished projects right away,
/// as [`BuildSlot::reconcile`](crate::slot::BuildSlot::reconcile) does.
pub fn advance(
    project: &mut BuildProject,
    designs: &dyn DesignLookup,
    available_industry: &mut i32,
    available_resources: &mut ResourcePool,
    civ: &mut dyn CivilizationManager,
    rules: &BuildRules,
) -> AdvanceReport {
    if project.is_paused() || project.is_cancelled() {
        return AdvanceReport::untouched(AdvanceOutcome::Skipped);
    }

    let Some(design) = designs.build_design(project.design()) else {
        tracing::warn!(
            design = ?project.design(),
            center = ?project.production_center(),
            "Build design not found, skipping project this turn"
        );
        return AdvanceReport::untouched(AdvanceOutcome::DesignMissing);
    };

    let rate = *available_industry;
    let estimate = time_estimate(project, design, rate);

    // Industry
    let industry_spent = (*available_industry)
        .max(0)
        .min(project.industry_remaining(design));
    *available_industry -= industry_spent;
    project.invest_industry(industry_spent);

    // Resources
    project.clear_shortages();
    let mut resources_spent = ResourcePool::ZERO;
    let mut shortages = Vec::new();

    for kind in ResourceKind::ALL {
        let remaining = design.resources_required[kind] - project.resources_invested()[kind];
        if remaining <= 0 {
            continue;
        }

        let available = available_resources[kind];
        if estimate == 1 && remaining > available {
            let shortfall = remaining - available.max(0);
            project.flag_shortage(kind);
            shortages.push(ResourceShortage { kind, shortfall });
            tracing::warn!(
                design = %design.name,
                resource = %kind,
                shortfall,
                "Resource shortage on final turn"
            );
            civ.append_sitrep(
                project.owner(),
                SitRepEntry::ResourceShortage {
                    center: project.production_center(),
                    resource: kind,
                    shortfall,
                    project: project.description(design),
                },
            );
        }

        if available <= 0 {
            continue;
        }

        let spread = (remaining / estimate + remaining % estimate).min(available);
        let taken = available_resources.subtract(kind, spread);
        project.invest_resource(kind, taken);
        resources_spent.add(kind, taken);
    }

    #[cfg(feature = "debug-validation")]
    debug_assert!(
        ResourceKind::ALL.iter().all(|&k| available_resources[k] >= 0),
        "available resources went negative"
    );

    let policy = rules.completion_policy;
    let completed = project.is_completed(design, policy);

    let mut changes = vec![
        Property::IndustryInvested,
        Property::TurnsRemaining,
        Property::PercentComplete,
        Property::IsPartiallyComplete,
    ];

    let outcome = if completed {
        changes.push(Property::IsCompleted);
        AdvanceOutcome::Completed {
            spawned: finish(project, design, civ),
        }
    } else {
        AdvanceOutcome::InProgress
    };

    tracing::debug!(
        design = %design.name,
        center = ?project.production_center(),
        industry = project.industry_invested(),
        required = design.industry_required,
        estimate,
        completed,
        "Advanced build project"
    );

    AdvanceReport {
        outcome,
        time_estimate: estimate,
        industry_spent,
        resources_spent,
        shortages,
        turns_remaining: project.turns_remaining(design, rate),
        changes,
    }
}

/// Place the finished object and report it.
fn finish(
    project: &BuildProject,
    design: &BuildDesign,
    civ: &mut dyn CivilizationManager,
) -> Option<SpawnedObject> {
    let Some(object) = civ.try_spawn(project.owner(), design, project.location()) else {
        tracing::warn!(
            design = %design.name,
            owner = ?project.owner(),
            location = %project.location(),
            "Finished project could not be placed"
        );
        return None;
    };

    let entry = if project.kind().is_structure() {
        SitRepEntry::BuildingBuilt {
            design: design.id,
            name: design.name.clone(),
            location: project.location(),
            active: object.active,
        }
    } else {
        SitRepEntry::ItemBuilt {
            design: design.id,
            name: design.name.clone(),
            location: project.location(),
        }
    };
    civ.append_sitrep(project.owner(), entry);

    tracing::info!(
        design = %design.name,
        owner = ?project.owner(),
        location = %project.location(),
        "Construction complete"
    );
    Some(object)
}
