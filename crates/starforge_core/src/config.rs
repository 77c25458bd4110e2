//! Tunable construction rules.
//!
//! Rules are plain data loaded from RON. Every field has a serde default, so
//! a rules file only needs to mention what it changes:
//!
//! ```ron
//! BuildRules(
//!     completion_policy: RequireResources,
//!     max_queue_len: 5,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{parse_ron, read_ron};
use crate::error::{GameError, Result};

/// When a project counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Finished once the industry requirement is met. Resource shortfalls are
    /// reported but do not hold the project back.
    #[default]
    IndustryOnly,
    /// Finished once both industry and every resource requirement are met.
    RequireResources,
}

/// Construction rules shared by every production center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRules {
    /// When a project counts as finished.
    pub completion_policy: CompletionPolicy,
    /// Priority given to newly created projects.
    pub default_project_priority: u8,
    /// Priority given to newly created slots.
    pub default_slot_priority: u8,
    /// Maximum number of pending items per slot.
    pub max_queue_len: usize,
    /// Credits charged per industry point when rushing.
    pub rush_cost_per_industry: i64,
}

impl BuildRules {
    /// Default project and slot priority.
    pub const NORMAL_PRIORITY: u8 = 128;
    /// Default maximum queue length.
    pub const DEFAULT_MAX_QUEUE_LEN: usize = 8;

    /// Create rules with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completion_policy: CompletionPolicy::IndustryOnly,
            default_project_priority: Self::NORMAL_PRIORITY,
            default_slot_priority: Self::NORMAL_PRIORITY,
            max_queue_len: Self::DEFAULT_MAX_QUEUE_LEN,
            rush_cost_per_industry: 1,
        }
    }

    /// Replace the completion policy.
    #[must_use]
    pub const fn with_completion_policy(mut self, policy: CompletionPolicy) -> Self {
        self.completion_policy = policy;
        self
    }

    /// Check the rules for values that would break turn processing.
    ///
    /// Returns a list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_queue_len == 0 {
            errors.push("max_queue_len must be at least 1".to_string());
        }
        if self.rush_cost_per_industry < 0 {
            errors.push(format!(
                "rush_cost_per_industry cannot be negative (got {})",
                self.rush_cost_per_industry
            ));
        }

        errors
    }

    /// Fail with a [`GameError::DataParseError`] naming `origin` if invalid.
    pub(crate) fn checked(self, origin: &str) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(GameError::DataParseError {
                path: origin.to_string(),
                message: errors.join("; "),
            })
        }
    }

    /// Parse and validate rules from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        parse_ron::<Self>(source, "<inline>")?.checked("<inline>")
    }

    /// Load and validate rules from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        read_ron::<Self>(path)?.checked(&path.display().to_string())
    }
}

impl Default for BuildRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = BuildRules::default();
        assert_eq!(rules.completion_policy, CompletionPolicy::IndustryOnly);
        assert_eq!(rules.default_project_priority, BuildRules::NORMAL_PRIORITY);
        assert_eq!(rules.max_queue_len, BuildRules::DEFAULT_MAX_QUEUE_LEN);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let rules =
            BuildRules::from_ron_str("(completion_policy: RequireResources, max_queue_len: 3)")
                .unwrap();
        assert_eq!(rules.completion_policy, CompletionPolicy::RequireResources);
        assert_eq!(rules.max_queue_len, 3);
        assert_eq!(rules.default_slot_priority, BuildRules::NORMAL_PRIORITY);
        assert_eq!(rules.rush_cost_per_industry, 1);
    }

    #[test]
    fn test_validate_rejects_negative_rush_cost_and_empty_queue() {
        let rules = BuildRules {
            max_queue_len: 0,
            rush_cost_per_industry: -5,
            ..BuildRules::default()
        };
        assert_eq!(rules.validate().len(), 2);
        assert!(BuildRules::default().validate().is_empty());

        let Err(GameError::DataParseError { message, .. }) =
            BuildRules::from_ron_str("(rush_cost_per_industry: -5)")
        else {
            panic!("negative rush cost should be rejected");
        };
        assert!(message.contains("rush_cost_per_industry"));

        assert!(BuildRules::from_ron_str("(max_queue_len: 0)").is_err());
        assert!(BuildRules::from_ron_str("(rush_cost_per_industry: 0)").is_ok());
    }

    #[test]
    fn test_bad_ron_is_parse_error() {
        let err = BuildRules::from_ron_str("(completion_policy: Sometimes)").unwrap_err();
        assert!(matches!(err, GameError::DataParseError { .. }));
    }
}
