//! Build slots: one construction line with a pending queue.
//!
//! A slot owns at most one active project. Everything else waits in a FIFO
//! queue of [`BuildQueueItem`]s that are turned into projects only when they
//! reach the front. [`BuildSlot::reconcile`] runs at turn end and performs
//! the `Completing -> Empty/Active` transition.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::components::DesignId;
use crate::config::BuildRules;
use crate::design::{BuildDesign, DesignLookup, ProjectKind};
use crate::error::{GameError, Result};
use crate::notify::Property;
use crate::project::{BuildProject, ProjectSite};

/// A design waiting its turn in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildQueueItem {
    /// Design to build.
    pub design: DesignId,
    /// Project kind that will carry it.
    pub kind: ProjectKind,
    /// Priority the project starts with.
    pub priority: u8,
}

impl BuildQueueItem {
    /// Queue `design` at `priority`.
    #[must_use]
    pub fn new(design: &BuildDesign, priority: u8) -> Self {
        Self {
            design: design.id,
            kind: design.kind,
            priority,
        }
    }

    /// Turn the item into a fresh project at `site`.
    #[must_use]
    pub fn instantiate(&self, site: ProjectSite) -> BuildProject {
        BuildProject::fresh(self.kind, self.design, site, self.priority)
    }
}

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// No active project.
    Empty,
    /// Working on a project.
    Active,
    /// The active project is finished and waits to be retired.
    Completing,
}

/// Why a project left its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetireReason {
    /// The project finished.
    Completed,
    /// The project was cancelled.
    Cancelled,
}

/// Result of [`BuildSlot::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The project that left the slot, and why.
    pub retired: Option<(BuildProject, RetireReason)>,
    /// The queue item that became the new active project.
    pub promoted: Option<BuildQueueItem>,
    /// Properties that changed.
    pub changes: Vec<Property>,
}

/// A single construction line at a production center.
///
/// Field order is the persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildSlot {
    priority: u8,
    project: Option<BuildProject>,
    queue: VecDeque<BuildQueueItem>,
}

impl BuildSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new(priority: u8) -> Self {
        Self {
            priority,
            project: None,
            queue: VecDeque::new(),
        }
    }

    /// Scheduling priority of the slot among its center's slots.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Set the slot priority, clamped to `0..=255`.
    pub fn set_priority(&mut self, priority: i32) -> Vec<Property> {
        self.priority = priority.clamp(0, i32::from(u8::MAX)) as u8;
        vec![Property::Priority]
    }

    /// The active project, if any.
    #[must_use]
    pub const fn project(&self) -> Option<&BuildProject> {
        self.project.as_ref()
    }

    /// Mutable access to the active project.
    pub fn project_mut(&mut self) -> Option<&mut BuildProject> {
        self.project.as_mut()
    }

    /// Check if a project is active.
    #[must_use]
    pub const fn has_project(&self) -> bool {
        self.project.is_some()
    }

    /// Replace the active project directly, bypassing the queue.
    ///
    /// Returns the previous project along with the touched properties.
    pub fn set_project(
        &mut self,
        project: Option<BuildProject>,
    ) -> (Option<BuildProject>, Vec<Property>) {
        let had_project = self.project.is_some();
        let has_project = project.is_some();
        let previous = std::mem::replace(&mut self.project, project);

        let mut changes = vec![Property::Project];
        if had_project != has_project {
            changes.push(Property::HasProject);
        }
        (previous, changes)
    }

    /// Pending items in execution order.
    pub fn queue(&self) -> impl Iterator<Item = &BuildQueueItem> {
        self.queue.iter()
    }

    /// Number of pending items.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Append an item to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::QueueFull`] if the queue already holds
    /// `rules.max_queue_len` items.
    pub fn enqueue(&mut self, item: BuildQueueItem, rules: &BuildRules) -> Result<()> {
        if self.queue.len() >= rules.max_queue_len {
            return Err(GameError::QueueFull {
                max: rules.max_queue_len,
            });
        }
        self.queue.push_back(item);
        Ok(())
    }

    /// Remove the pending item at `index`.
    pub fn dequeue_at(&mut self, index: usize) -> Option<BuildQueueItem> {
        self.queue.remove(index)
    }

    /// Swap the pending item at `index` with the one ahead of it.
    ///
    /// Returns `false` if the item is already first or out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.queue.len() {
            return false;
        }
        self.queue.swap(index - 1, index);
        true
    }

    /// Drop every pending item.
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Current lifecycle state.
    ///
    /// A paused project, or one whose design cannot be found, counts as
    /// active: it only completes through an advance.
    #[must_use]
    pub fn state(&self, designs: &dyn DesignLookup, rules: &BuildRules) -> SlotState {
        match &self.project {
            None => SlotState::Empty,
            Some(project) if project.is_paused() => SlotState::Active,
            Some(project) => match designs.build_design(project.design()) {
                Some(design) if project.is_completed(design, rules.completion_policy) => {
                    SlotState::Completing
                }
                _ => SlotState::Active,
            },
        }
    }

    /// Turn-end bookkeeping.
    ///
    /// Drops a cancelled project, retires a finished one, then promotes the
    /// head of the queue if the slot ended up empty.
    pub fn reconcile(
        &mut self,
        designs: &dyn DesignLookup,
        site: ProjectSite,
        rules: &BuildRules,
    ) -> Reconciliation {
        let mut result = Reconciliation::default();

        let reason = match &self.project {
            Some(p) if p.is_cancelled() => Some(RetireReason::Cancelled),
            Some(_) if self.state(designs, rules) == SlotState::Completing => {
                Some(RetireReason::Completed)
            }
            _ => None,
        };

        if let Some(reason) = reason {
            let (retired, changes) = self.set_project(None);
            result.changes.extend(changes);
            result.retired = retired.map(|p| (p, reason));
        }

        if self.project.is_none() {
            if let Some(item) = self.queue.pop_front() {
                let (_, changes) = self.set_project(Some(item.instantiate(site)));
                result.changes.extend(changes);
                result.promoted = Some(item);
            }
        }

        result
    }
}

impl Default for BuildSlot {
    fn default() -> Self {
        Self::new(BuildRules::NORMAL_PRIORITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CivId, MapLocation, ProductionCenterId};
    use crate::design::DesignRegistry;
    use crate::resources::ResourcePool;

    fn designs() -> DesignRegistry {
        [
            BuildDesign::new(DesignId(1), "Scout", ProjectKind::Ship, 10, ResourcePool::ZERO),
            BuildDesign::new(DesignId(2), "Lab", ProjectKind::Building, 20, ResourcePool::ZERO),
        ]
        .into_iter()
        .collect()
    }

    fn site() -> ProjectSite {
        ProjectSite {
            owner: CivId(1),
            center: ProductionCenterId(1),
            location: MapLocation::new(0, 0),
        }
    }

    fn item(id: u32, priority: u8) -> BuildQueueItem {
        BuildQueueItem::new(designs().get(DesignId(id)).unwrap(), priority)
    }

    #[test]
    fn test_empty_slot() {
        let slot = BuildSlot::default();
        assert!(!slot.has_project());
        assert_eq!(slot.state(&designs(), &BuildRules::default()), SlotState::Empty);
        assert_eq!(slot.priority(), BuildRules::NORMAL_PRIORITY);
    }

    #[test]
    fn test_set_project_reports_changes() {
        let mut slot = BuildSlot::default();
        let (prev, changes) = slot.set_project(Some(item(1, 5).instantiate(site())));
        assert!(prev.is_none());
        assert_eq!(changes, vec![Property::Project, Property::HasProject]);

        let (prev, changes) = slot.set_project(Some(item(2, 5).instantiate(site())));
        assert_eq!(prev.unwrap().design(), DesignId(1));
        assert_eq!(changes, vec![Property::Project]);
    }

    #[test]
    fn test_set_priority_clamps() {
        let mut slot = BuildSlot::default();
        assert_eq!(slot.set_priority(300), vec![Property::Priority]);
        assert_eq!(slot.priority(), 255);
        slot.set_priority(-10);
        assert_eq!(slot.priority(), 0);
    }

    #[test]
    fn test_queue_limits_and_ordering() {
        let rules = BuildRules {
            max_queue_len: 2,
            ..BuildRules::default()
        };
        let mut slot = BuildSlot::default();
        slot.enqueue(item(1, 1), &rules).unwrap();
        slot.enqueue(item(2, 2), &rules).unwrap();
        assert!(matches!(
            slot.enqueue(item(1, 3), &rules),
            Err(GameError::QueueFull { max: 2 })
        ));

        assert!(slot.move_up(1));
        assert!(!slot.move_up(0));
        assert!(!slot.move_up(5));
        let order: Vec<_> = slot.queue().map(|i| i.design).collect();
        assert_eq!(order, vec![DesignId(2), DesignId(1)]);

        assert_eq!(slot.dequeue_at(0).unwrap().design, DesignId(2));
        assert_eq!(slot.queue_len(), 1);
        slot.clear_queue();
        assert_eq!(slot.queue_len(), 0);
    }

    #[test]
    fn test_reconcile_promotes_into_empty_slot() {
        let designs = designs();
        let rules = BuildRules::default();
        let mut slot = BuildSlot::default();
        slot.enqueue(item(1, 42), &rules).unwrap();

        let result = slot.reconcile(&designs, site(), &rules);
        assert!(result.retired.is_none());
        assert_eq!(result.promoted.unwrap().design, DesignId(1));
        assert_eq!(slot.project().unwrap().priority(), 42);
        assert_eq!(slot.state(&designs, &rules), SlotState::Active);
    }

    #[test]
    fn test_reconcile_retires_completed_and_promotes() {
        let designs = designs();
        let rules = BuildRules::default();
        let mut slot = BuildSlot::default();
        let mut project = item(1, 5).instantiate(site());
        project.invest_industry(10);
        slot.set_project(Some(project));
        slot.enqueue(item(2, 9), &rules).unwrap();
        assert_eq!(slot.state(&designs, &rules), SlotState::Completing);

        let result = slot.reconcile(&designs, site(), &rules);
        let (retired, reason) = result.retired.unwrap();
        assert_eq!(retired.design(), DesignId(1));
        assert_eq!(reason, RetireReason::Completed);
        assert_eq!(slot.project().unwrap().design(), DesignId(2));
        assert_eq!(slot.queue_len(), 0);
        // Replaced in place, so HasProject flips twice.
        assert_eq!(
            result.changes,
            vec![
                Property::Project,
                Property::HasProject,
                Property::Project,
                Property::HasProject
            ]
        );
    }

    #[test]
    fn test_reconcile_drops_cancelled_and_leaves_empty() {
        let designs = designs();
        let rules = BuildRules::default();
        let mut slot = BuildSlot::default();
        let mut project = item(1, 5).instantiate(site());
        project.cancel();
        slot.set_project(Some(project));

        let result = slot.reconcile(&designs, site(), &rules);
        assert_eq!(result.retired.unwrap().1, RetireReason::Cancelled);
        assert!(result.promoted.is_none());
        assert_eq!(slot.state(&designs, &rules), SlotState::Empty);
    }

    #[test]
    fn test_reconcile_keeps_paused_finished_project() {
        let designs = designs();
        let rules = BuildRules::default();
        let mut slot = BuildSlot::default();
        let mut project = item(1, 5).instantiate(site());
        project.invest_industry(10);
        project.pause();
        slot.set_project(Some(project));
        assert_eq!(slot.state(&designs, &rules), SlotState::Active);

        let result = slot.reconcile(&designs, site(), &rules);
        assert_eq!(result, Reconciliation::default());
        assert!(slot.project().unwrap().is_paused());
    }

    #[test]
    fn test_reconcile_keeps_active_project() {
        let designs = designs();
        let rules = BuildRules::default();
        let mut slot = BuildSlot::default();
        slot.set_project(Some(item(2, 5).instantiate(site())));
        slot.enqueue(item(1, 5), &rules).unwrap();

        let result = slot.reconcile(&designs, site(), &rules);
        assert_eq!(result, Reconciliation::default());
        assert_eq!(slot.queue_len(), 1);
    }
}
