//! End-of-turn construction processing.

use serde::{Deserialize, Serialize};

use crate::advancer::{advance, AdvanceOutcome};
use crate::civilization::CivilizationLedger;
use crate::components::{DesignId, ObjectId, ProductionCenterId};
use crate::config::BuildRules;
use crate::context::GameContext;
use crate::design::DesignLookup;
use crate::notify::tag;
use crate::project::BuildProject;
use crate::resources::ResourceKind;
use crate::slot::RetireReason;

/// Something that happened to a specific slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvent {
    /// Production center owning the slot.
    pub center: ProductionCenterId,
    /// Slot index within the center.
    pub slot: usize,
    /// Design involved.
    pub design: DesignId,
}

/// A finished project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Where it was built.
    pub slot: SlotEvent,
    /// The placed object, if placement succeeded.
    pub object: Option<ObjectId>,
}

/// A resource a project could not get enough of on its final turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortageEvent {
    /// Where the project is being built.
    pub slot: SlotEvent,
    /// Missing resource.
    pub resource: ResourceKind,
    /// How much was missing.
    pub shortfall: i32,
}

/// A project bought out with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RushEvent {
    /// Where the project is being built.
    pub slot: SlotEvent,
    /// Industry bought.
    pub industry: i32,
    /// Credits charged.
    pub cost: i64,
}

/// Events produced by one call to [`GameContext::process_turn`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Turn number that was just processed.
    pub turn: u64,
    /// Projects that finished.
    pub completed: Vec<CompletionEvent>,
    /// Cancelled projects that were dropped.
    pub cancelled: Vec<SlotEvent>,
    /// Queue items that became active projects.
    pub promoted: Vec<SlotEvent>,
    /// Final-turn resource shortages.
    pub shortages: Vec<ShortageEvent>,
    /// Projects skipped because their design is unknown.
    pub missing_designs: Vec<SlotEvent>,
    /// Projects bought out with credits.
    pub rushed: Vec<RushEvent>,
}

impl TurnSummary {
    fn new(turn: u64) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }

    /// Check if nothing noteworthy happened.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.completed.is_empty()
            && self.cancelled.is_empty()
            && self.promoted.is_empty()
            && self.shortages.is_empty()
            && self.missing_designs.is_empty()
            && self.rushed.is_empty()
    }
}

impl GameContext {
    /// Process construction for one turn.
    ///
    /// Centers are visited in id order. Within a center, slots are visited
    /// by descending slot priority and share the center's output, so a
    /// high-priority slot can starve the ones after it. Each slot then:
    ///
    /// 1. Buys out a rushed project if the owner can pay.
    /// 2. Advances its active project.
    /// 3. Retires a finished or cancelled project and promotes the head of
    ///    its queue. Promoted projects start advancing next turn.
    ///
    /// Property changes are broadcast once the whole turn is done.
    pub fn process_turn(&mut self) -> TurnSummary {
        self.turn += 1;
        let mut summary = TurnSummary::new(self.turn);
        let mut changes = Vec::new();

        let Self {
            rules,
            designs,
            civilizations,
            centers,
            observers,
            ..
        } = self;
        let designs = &*designs;
        let rules = &*rules;

        for center in centers.values_mut() {
            let center_id = center.id;
            let site = center.site();
            let (mut industry, mut resources) = center.available_output();

            for index in center.slot_order() {
                let slot = &mut center.slots_mut()[index];
                let at = |design| SlotEvent {
                    center: center_id,
                    slot: index,
                    design,
                };

                if let Some(project) = slot.project_mut() {
                    if let Some((bought, cost)) = apply_rush(project, designs, civilizations, rules) {
                        summary.rushed.push(RushEvent {
                            slot: at(project.design()),
                            industry: bought,
                            cost,
                        });
                    }

                    let report = advance(
                        project,
                        designs,
                        &mut industry,
                        &mut resources,
                        civilizations,
                        rules,
                    );
                    changes.extend(tag(center_id, index, report.changes));

                    match report.outcome {
                        AdvanceOutcome::DesignMissing => {
                            summary.missing_designs.push(at(project.design()));
                        }
                        AdvanceOutcome::Completed { spawned } => {
                            summary.completed.push(CompletionEvent {
                                slot: at(project.design()),
                                object: spawned.map(|o| o.id),
                            });
                        }
                        AdvanceOutcome::Skipped | AdvanceOutcome::InProgress => {}
                    }
                    summary
                        .shortages
                        .extend(report.shortages.iter().map(|s| ShortageEvent {
                            slot: at(project.design()),
                            resource: s.kind,
                            shortfall: s.shortfall,
                        }));
                }

                let reconciled = slot.reconcile(designs, site, rules);
                changes.extend(tag(center_id, index, reconciled.changes));
                if let Some((project, RetireReason::Cancelled)) = &reconciled.retired {
                    summary.cancelled.push(at(project.design()));
                }
                if let Some(item) = reconciled.promoted {
                    tracing::debug!(
                        center = ?center_id,
                        slot = index,
                        design = ?item.design,
                        "Promoted queued project"
                    );
                    summary.promoted.push(at(item.design));
                }
            }
        }

        observers.broadcast(&changes);

        tracing::info!(
            turn = self.turn,
            completed = summary.completed.len(),
            shortages = summary.shortages.len(),
            "Processed construction turn"
        );

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(turn = self.turn, state_hash = hash, "Construction state hash");
        }

        summary
    }
}

/// Buy the remaining industry of a rushed project.
///
/// Returns the industry bought and its price. A request the owner cannot
/// pay for stays pending and is retried next turn.
fn apply_rush(
    project: &mut BuildProject,
    designs: &dyn DesignLookup,
    civilizations: &mut CivilizationLedger,
    rules: &BuildRules,
) -> Option<(i32, i64)> {
    if !project.is_rushed() || project.is_paused() || project.is_cancelled() {
        return None;
    }

    let design = designs.build_design(project.design())?;
    let remaining = project.industry_remaining(design);
    if remaining == 0 {
        project.clear_rush();
        return None;
    }

    let cost = i64::from(remaining).saturating_mul(rules.rush_cost_per_industry);
    if !civilizations.spend_credits(project.owner(), cost) {
        tracing::warn!(
            design = %design.name,
            owner = ?project.owner(),
            cost,
            "Not enough credits to rush project"
        );
        return None;
    }

    project.clear_rush();
    project.invest_industry(remaining);
    tracing::info!(
        design = %design.name,
        owner = ?project.owner(),
        industry = remaining,
        cost,
        "Rushed project"
    );
    Some((remaining, cost))
}
