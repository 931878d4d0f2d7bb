use crate::utils::constants::{ID_PLACEHOLDER, INTERCOMP_IDENTIFIER, LOG_EXTENSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One dispatch of the external entry point: a single radar or the combined run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchTarget {
    Radar(String),
    Intercomp,
}

impl DispatchTarget {
    /// Radar targets in declaration order followed by the combined run.
    pub fn daily_sequence(radars: &[String]) -> Vec<Self> {
        radars
            .iter()
            .cloned()
            .map(DispatchTarget::Radar)
            .chain(std::iter::once(DispatchTarget::Intercomp))
            .collect()
    }

    pub fn identifier(&self) -> &str {
        match self {
            DispatchTarget::Radar(code) => code,
            DispatchTarget::Intercomp => INTERCOMP_IDENTIFIER,
        }
    }

    /// Configuration name: the radar template filled in, or the fixed intercomp config.
    pub fn config_name(&self, radar_template: &str, intercomp_config: &str) -> String {
        match self {
            DispatchTarget::Radar(code) => radar_template.replace(ID_PLACEHOLDER, code),
            DispatchTarget::Intercomp => intercomp_config.to_string(),
        }
    }

    pub fn log_path(&self, log_dir: &Path) -> PathBuf {
        log_dir.join(format!("{}.{}", self.identifier(), LOG_EXTENSION))
    }
}

impl std::fmt::Display for DispatchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
