//! Data validation utilities.

use std::path::{Path, PathBuf};

use starforge_core::config::BuildRules;
use starforge_core::data::{load_designs, Scenario};

use crate::{Result, ToolError};

/// What a data file holds, judged by its location and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFileKind {
    /// A list of designs.
    Designs,
    /// Construction rules.
    Rules,
    /// A complete scenario.
    Scenario,
}

impl DataFileKind {
    /// Classify a RON file. Returns `None` for files that are not data.
    #[must_use]
    pub fn classify(path: &Path) -> Option<Self> {
        if path.extension().and_then(|e| e.to_str()) != Some("ron") {
            return None;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let in_scenarios = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|d| d == "scenarios");

        Some(if in_scenarios {
            Self::Scenario
        } else if stem.contains("rules") {
            Self::Rules
        } else {
            Self::Designs
        })
    }
}

/// Validate one data file.
///
/// Scenarios are fully built, so dangling design names and unknown owners
/// are caught too.
pub fn validate_file(path: &Path, kind: DataFileKind) -> Result<()> {
    match kind {
        DataFileKind::Designs => {
            let designs = load_designs(path)?;
            tracing::debug!(path = %path.display(), count = designs.len(), "Designs ok");
        }
        DataFileKind::Rules => {
            BuildRules::load(path)?;
        }
        DataFileKind::Scenario => {
            Scenario::load(path)?.build()?;
        }
    }
    Ok(())
}

fn collect_ron_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| ToolError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|source| ToolError::Io {
                path: dir.display().to_string(),
                source,
            })?
            .path();
        if path.is_dir() {
            collect_ron_files(&path, out)?;
        } else if DataFileKind::classify(&path).is_some() {
            out.push(path);
        }
    }
    Ok(())
}

/// Validate all RON data files in a directory tree.
///
/// Returns the number of files checked.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or any data file fails
/// validation. Every failure is logged before returning.
pub fn validate_data_directory(path: &Path) -> Result<usize> {
    let mut files = Vec::new();
    collect_ron_files(path, &mut files)?;
    files.sort();

    let mut failed = 0;
    for file in &files {
        let Some(kind) = DataFileKind::classify(file) else {
            continue;
        };
        match validate_file(file, kind) {
            Ok(()) => tracing::info!(file = %file.display(), ?kind, "Valid"),
            Err(e) => {
                failed += 1;
                tracing::error!(file = %file.display(), ?kind, "Invalid: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(ToolError::Invalid {
            checked: files.len(),
            failed,
        });
    }
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets")
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            DataFileKind::classify(Path::new("assets/scenarios/frontier.ron")),
            Some(DataFileKind::Scenario)
        );
        assert_eq!(
            DataFileKind::classify(Path::new("assets/data/build_rules.ron")),
            Some(DataFileKind::Rules)
        );
        assert_eq!(
            DataFileKind::classify(Path::new("assets/data/designs.ron")),
            Some(DataFileKind::Designs)
        );
        assert_eq!(DataFileKind::classify(Path::new("README.md")), None);
    }

    #[test]
    fn test_shipped_assets_are_valid() {
        let checked = validate_data_directory(&assets()).unwrap();
        assert_eq!(checked, 3);
    }

    #[test]
    fn test_missing_directory() {
        assert!(matches!(
            validate_data_directory(Path::new("/definitely/not/here")),
            Err(ToolError::Io { .. })
        ));
    }
}
