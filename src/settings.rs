//! Layered driver settings.
//!
//! Defaults are overridden by an optional TOML file and then by `INTERCOMP_*`
//! environment variables (`INTERCOMP_RADARS=A,D,L`, `INTERCOMP_LOG_DIR=...`).

use crate::dispatch::ErrorPolicy;
use crate::error::{DriverError, Result};
use crate::utils::constants::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DriverSettings {
    /// External processing entry point, resolved through `PATH`.
    #[validate(length(min = 1))]
    pub entry_point: String,

    #[validate(length(min = 1))]
    pub radars: Vec<String>,

    /// Per-radar configuration name; `{id}` is replaced by the radar code.
    #[validate(length(min = 1))]
    pub config_template: String,

    #[validate(length(min = 1))]
    pub intercomp_config: String,

    #[validate(length(equal = 6))]
    pub start_time: String,

    #[validate(length(equal = 6))]
    pub end_time: String,

    pub state_file: PathBuf,
    pub log_dir: PathBuf,
    pub artifact_glob: String,
    pub archive_dir: PathBuf,

    pub environment: EnvironmentSettings,
    pub error_policy: ErrorPolicy,
}

/// Runtime environment bracketing every external invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Empty disables activation entirely.
    pub name: String,
    pub activate_command: String,
    pub deactivate_command: String,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_ENVIRONMENT.to_string(),
            activate_command: DEFAULT_ACTIVATE_COMMAND.to_string(),
            deactivate_command: DEFAULT_DEACTIVATE_COMMAND.to_string(),
        }
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            radars: DEFAULT_RADARS.iter().map(|r| r.to_string()).collect(),
            config_template: DEFAULT_CONFIG_TEMPLATE.to_string(),
            intercomp_config: DEFAULT_INTERCOMP_CONFIG.to_string(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            artifact_glob: DEFAULT_ARTIFACT_GLOB.to_string(),
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            environment: EnvironmentSettings::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl DriverSettings {
    /// Load defaults, then `file` if given, then environment overrides.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Values stay strings: numeric parsing would strip leading zeros off
        // time literals and radar codes. List splitting in `config` only runs
        // alongside that parsing, so the radar list is split here.
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );
        if let Ok(radars) = std::env::var(RADARS_ENV_VAR) {
            builder = builder.set_override("radars", split_radar_list(&radars))?;
        }

        let settings: DriverSettings = builder.build()?.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    /// Field validation plus the cross-field rules derive cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !self.config_template.contains(ID_PLACEHOLDER) {
            return Err(DriverError::Config(format!(
                "config_template '{}' must contain the {} placeholder",
                self.config_template, ID_PLACEHOLDER
            )));
        }

        if let Some(radar) = self.radars.iter().find(|r| r.trim().is_empty()) {
            return Err(DriverError::Config(format!(
                "radar identifiers must not be blank, got {:?}",
                radar
            )));
        }

        if self
            .radars
            .iter()
            .any(|r| r.as_str() == INTERCOMP_IDENTIFIER)
        {
            return Err(DriverError::Config(format!(
                "'{}' is reserved for the combined run",
                INTERCOMP_IDENTIFIER
            )));
        }

        for time in [&self.start_time, &self.end_time] {
            if !time.chars().all(|c| c.is_ascii_digit()) {
                return Err(DriverError::Config(format!(
                    "time literal '{}' must be six digits (HHMMSS)",
                    time
                )));
            }
        }

        Ok(())
    }
}

/// `A, D,L` -> `["A", "D", "L"]`; blank entries are dropped.
fn split_radar_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
