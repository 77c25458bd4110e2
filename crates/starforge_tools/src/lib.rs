//! # Starforge Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - Headless turn simulator

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod simulate;
pub mod validate;

use thiserror::Error;

/// Errors reported by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Error from the construction core.
    #[error(transparent)]
    Game(#[from] starforge_core::error::GameError),

    /// A directory could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// One or more data files are invalid.
    #[error("{failed} of {checked} data files failed validation")]
    Invalid {
        /// Number of files checked.
        checked: usize,
        /// Number of files that failed.
        failed: usize,
    },
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
