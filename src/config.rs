//! Settings for the authorization engine.
//!
//! Settings come from a YAML file, from environment variables, or both
//! (environment wins). Everything has a default so an empty file is valid.

use crate::error::ConfigError;
use chrono::Duration;
use std::env;
use std::path::Path;
use tracing::debug;

/// Environment override for [`AuthzSettings::trashbin_cutoff_days`].
pub const ENV_TRASHBIN_CUTOFF_DAYS: &str = "AUTHZ_TRASHBIN_CUTOFF_DAYS";
/// Environment override for [`AuthzSettings::max_ancestor_depth`].
pub const ENV_MAX_ANCESTOR_DEPTH: &str = "AUTHZ_MAX_ANCESTOR_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AuthzSettings {
    /// Days a soft-deleted resource stays visible to its owners.
    pub trashbin_cutoff_days: u32,
    /// Upper bound on the ancestor walk when collecting inherited roles.
    pub max_ancestor_depth: usize,
}

impl Default for AuthzSettings {
    fn default() -> Self {
        AuthzSettings { trashbin_cutoff_days: 30, max_ancestor_depth: 64 }
    }
}

impl AuthzSettings {
    /// Parses settings from a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let settings: AuthzSettings =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_yaml(&content)?;
        debug!("Loaded authorization settings from file: {}", path.display());
        Ok(settings)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Applies any environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Applies overrides found by `lookup`, keyed by the `ENV_*` names.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(days) = lookup(ENV_TRASHBIN_CUTOFF_DAYS) {
            self.trashbin_cutoff_days = parse_override(ENV_TRASHBIN_CUTOFF_DAYS, &days)?;
        }
        if let Some(depth) = lookup(ENV_MAX_ANCESTOR_DEPTH) {
            self.max_ancestor_depth = parse_override(ENV_MAX_ANCESTOR_DEPTH, &depth)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trashbin_cutoff_days == 0 {
            return Err(ConfigError::Invalid("trashbin_cutoff_days must be positive".into()));
        }
        if self.max_ancestor_depth == 0 {
            return Err(ConfigError::Invalid("max_ancestor_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Retention window of the trashbin.
    pub fn trashbin_cutoff(&self) -> Duration {
        Duration::days(i64::from(self.trashbin_cutoff_days))
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| ConfigError::Parse(format!("Invalid {}: {}", key, e)))
}
