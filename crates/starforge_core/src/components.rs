//! Identifier and coordinate types shared by every simulation module.
//!
//! The core never holds references into the wider game-object graph.
//! Civilizations, designs, production centers and spawned objects are all
//! addressed through the small integer keys defined here.

use serde::{Deserialize, Serialize};

/// Unique identifier for civilizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivId(pub u32);

impl CivId {
    /// Create a new civilization ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for build designs in the tech database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(pub u32);

impl DesignId {
    /// Create a new design ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for production centers (colonies, shipyards, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductionCenterId(pub u32);

impl ProductionCenterId {
    /// Create a new production center ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier of a game object spawned by a finished project.
pub type ObjectId = u64;

/// A sector coordinate on the galaxy grid.
///
/// Fits in two bytes; galaxy maps never exceed 256 sectors per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct MapLocation {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
}

impl MapLocation {
    /// Create a new map location.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for MapLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
