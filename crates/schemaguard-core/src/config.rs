//! Configuration types for the snapshot guard.

use crate::error::GuardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one guard run.
///
/// # Example
///
/// ```rust
/// use schemaguard_core::GuardConfig;
///
/// let config = GuardConfig::from_toml_str(r#"
///     snapshot_location = "api/schema.snapshot"
///     allow_breaking_changes = true
/// "#).unwrap();
/// assert!(config.allow_breaking_changes);
/// assert!(config.run_label.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Path to the committed snapshot file.
    pub snapshot_location: PathBuf,

    /// Whether detected breaking changes are recorded instead of failing the run.
    pub allow_breaking_changes: bool,

    /// Label for change-log entries recorded by this run.
    ///
    /// Defaults to the current UTC date (`YYYY-MM-DD`).
    pub run_label: Option<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            snapshot_location: PathBuf::from("schema.snapshot"),
            allow_breaking_changes: false,
            run_label: None,
        }
    }
}

impl GuardConfig {
    /// Creates a configuration for the given snapshot path.
    pub fn new(snapshot_location: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_location: snapshot_location.into(),
            ..Self::default()
        }
    }

    /// Sets whether breaking changes are allowed.
    pub fn with_allow_breaking_changes(mut self, allow: bool) -> Self {
        self.allow_breaking_changes = allow;
        self
    }

    /// Pins the run label instead of using today's date.
    pub fn with_run_label(mut self, label: impl Into<String>) -> Self {
        self.run_label = Some(label.into());
        self
    }

    /// Parses a TOML configuration. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, GuardError> {
        toml::from_str(text).map_err(|e| GuardError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, GuardError> {
        let text = std::fs::read_to_string(path).map_err(|source| GuardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration for values that would corrupt the snapshot.
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.snapshot_location.as_os_str().is_empty() {
            return Err(GuardError::Config(
                "snapshot_location must not be empty".to_string(),
            ));
        }
        if let Some(label) = &self.run_label {
            if label.trim().is_empty() || label.contains(|c| c == ']' || c == '\n' || c == '\r') {
                return Err(GuardError::Config(format!(
                    "run_label {:?} must be non-empty, single-line and contain no ']'",
                    label
                )));
            }
        }
        Ok(())
    }

    /// The label used for entries recorded by this run.
    pub fn effective_run_label(&self) -> String {
        self.run_label
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
    }
}
