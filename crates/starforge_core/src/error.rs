//! Error types for the construction simulation.

use thiserror::Error;

use crate::components::{CivId, DesignId, ProductionCenterId};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all construction simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A project or slot was created with arguments that can never be valid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No build design registered under this identifier.
    #[error("Build design not found: {0:?}")]
    DesignNotFound(DesignId),

    /// No civilization registered under this identifier.
    #[error("Civilization not found: {0:?}")]
    CivilizationNotFound(CivId),

    /// No production center registered under this identifier.
    #[error("Production center not found: {0:?}")]
    ProductionCenterNotFound(ProductionCenterId),

    /// Slot index out of range for a production center.
    #[error("Production center {center:?} has no slot {slot}")]
    SlotNotFound {
        /// The production center that was addressed.
        center: ProductionCenterId,
        /// The requested slot index.
        slot: usize,
    },

    /// The pending queue of a slot is full.
    #[error("Build queue is full (max {max} items)")]
    QueueFull {
        /// Configured maximum queue length.
        max: usize,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Binary save data could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
