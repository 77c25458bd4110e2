//! Data-driven definitions loaded from RON.
//!
//! These types mirror the on-disk format and are converted into the runtime
//! types ([`BuildDesign`](crate::design::BuildDesign),
//! [`GameContext`](crate::context::GameContext)) after validation.

mod design_data;
mod scenario;

pub use design_data::{load_designs, load_designs_from_str, DesignData, ResourceAmounts};
pub use scenario::{CenterData, CivilizationData, Scenario, SlotData};

use std::path::Path;

use crate::error::{GameError, Result};

/// Read a RON file and parse it as `T`.
pub(crate) fn read_ron<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| GameError::DataParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_ron(&contents, &path.display().to_string())
}

/// Parse a RON string as `T`, naming `origin` in errors.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(source: &str, origin: &str) -> Result<T> {
    ron::from_str(source).map_err(|e| GameError::DataParseError {
        path: origin.to_string(),
        message: e.to_string(),
    })
}
