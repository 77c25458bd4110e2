//! Property-change notifications.
//!
//! Mutating operations return the list of [`Property`] values they touched.
//! The owner of the game context wraps them into [`PropertyChange`]s and
//! broadcasts them through [`Observers`] once the mutation is done.

use serde::{Deserialize, Serialize};

use crate::components::ProductionCenterId;

/// An externally observable property of a slot or its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Project industry invested.
    IndustryInvested,
    /// Project turn estimate.
    TurnsRemaining,
    /// Project completion ratio.
    PercentComplete,
    /// Project has progress but is not done.
    IsPartiallyComplete,
    /// Project finished.
    IsCompleted,
    /// Slot active project replaced.
    Project,
    /// Slot went from empty to busy or back.
    HasProject,
    /// Slot or project priority.
    Priority,
}

/// A property change on a specific slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Production center owning the slot.
    pub center: ProductionCenterId,
    /// Slot index within the center.
    pub slot: usize,
    /// What changed.
    pub property: Property,
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PropertyChange) + Send>;

/// Registered change listeners, called in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    /// Create an empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver every change to every listener.
    pub fn broadcast(&mut self, changes: &[PropertyChange]) {
        if self.listeners.is_empty() {
            return;
        }
        for change in changes {
            for (_, listener) in &mut self.listeners {
                listener(change);
            }
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Attach a slot address to a batch of touched properties.
pub(crate) fn tag(
    center: ProductionCenterId,
    slot: usize,
    properties: impl IntoIterator<Item = Property>,
) -> impl Iterator<Item = PropertyChange> {
    properties
        .into_iter()
        .map(move |property| PropertyChange {
            center,
            slot,
            property,
        })
}
