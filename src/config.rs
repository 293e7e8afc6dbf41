//! Planning configuration shared by the transfer and checklist services.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How cancelled transfer tasks count toward plan completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledTaskPolicy {
    /// Cancelled tasks leave the completion denominator.
    ///
    /// A plan completes once every non-cancelled task is completed. A plan
    /// whose tasks were all cancelled becomes cancelled itself.
    #[default]
    ExcludeFromCompletion,
    /// Cancelled tasks stay in the denominator, so a plan with any cancelled
    /// task never reaches `completed`.
    BlockCompletion,
}

/// Limits and policies applied by the planning services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Cancelled-task completion policy.
    pub cancelled_tasks: CancelledTaskPolicy,
    /// Maximum number of tasks a single plan may hold.
    pub max_tasks_per_plan: u32,
    /// Maximum length in characters of free-form notes.
    pub max_notes_length: usize,
    /// Maximum length in characters of plan names and checklist titles.
    pub max_name_length: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            cancelled_tasks: CancelledTaskPolicy::ExcludeFromCompletion,
            max_tasks_per_plan: 500,
            max_notes_length: 2_000,
            max_name_length: 200,
        }
    }
}

impl PlanningConfig {
    /// Parses a configuration from TOML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] when a limit is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tasks_per_plan == 0 {
            return Err(ConfigError::ZeroLimit("max_tasks_per_plan"));
        }
        if self.max_notes_length == 0 {
            return Err(ConfigError::ZeroLimit("max_notes_length"));
        }
        if self.max_name_length == 0 {
            return Err(ConfigError::ZeroLimit("max_name_length"));
        }
        Ok(())
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid planning configuration: {0}")]
    Parse(String),
    /// A limit was configured as zero.
    #[error("planning limit '{0}' must be greater than zero")]
    ZeroLimit(&'static str),
}
