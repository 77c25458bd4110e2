//! # Starforge Core
//!
//! Deterministic construction model for a turn-based space strategy game.
//!
//! This crate contains **only** construction logic:
//! - No rendering
//! - No global state: everything lives in an explicit [`GameContext`](context::GameContext)
//! - No floating-point math (integer amounts, fixed-point ratios)
//!
//! Production centers own build slots. Each slot works on one
//! [`BuildProject`](project::BuildProject) at a time and keeps a queue of
//! designs waiting their turn. Every turn the centers pour their industry
//! and resources into their projects, in slot priority order.
//!
//! ## Crate Structure
//!
//! - [`resources`] - Resource kinds and pools
//! - [`design`] - Build designs and the design lookup seam
//! - [`project`] - Build projects and their state flags
//! - [`advancer`] - Per-turn project advancement
//! - [`slot`] - Build slots and their queues
//! - [`center`] - Production centers
//! - [`context`] - The game context and its commands
//! - [`turn`] - End-of-turn processing
//! - [`data`] - RON data files and scenarios

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod advancer;
pub mod center;
pub mod civilization;
pub mod components;
pub mod config;
pub mod context;
pub mod data;
pub mod design;
pub mod error;
pub mod math;
pub mod notify;
pub mod persistence;
pub mod project;
pub mod resources;
pub mod sitrep;
pub mod slot;
pub mod turn;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::advancer::{advance, time_estimate, AdvanceOutcome, AdvanceReport};
    pub use crate::center::ProductionCenter;
    pub use crate::civilization::{
        Civilization, CivilizationLedger, CivilizationManager, SpawnedObject,
    };
    pub use crate::components::*;
    pub use crate::config::{BuildRules, CompletionPolicy};
    pub use crate::context::GameContext;
    pub use crate::design::{BuildDesign, DesignLookup, DesignRegistry, ProjectKind};
    pub use crate::error::{GameError, Result};
    pub use crate::math::Fixed;
    pub use crate::notify::{Property, PropertyChange, SubscriptionId};
    pub use crate::project::{BuildProject, BuildProjectFlags, ProjectSite};
    pub use crate::resources::{ResourceKind, ResourcePool};
    pub use crate::sitrep::SitRepEntry;
    pub use crate::slot::{BuildQueueItem, BuildSlot, SlotState};
    pub use crate::turn::TurnSummary;
}
