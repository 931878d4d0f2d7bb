use crate::error::{DriverError, Result};
use crate::models::RunState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The only reader and writer of the persisted run state file.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last run date, `None` when no run has been recorded yet.
    pub fn load(&self) -> Result<Option<RunState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No run state recorded");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        content
            .parse::<RunState>()
            .map(Some)
            .map_err(|_| DriverError::InvalidState {
                path: self.path.clone(),
                content: content.trim_end().to_string(),
            })
    }

    pub fn save(&self, state: &RunState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{}\n", state))?;
        debug!(path = %self.path.display(), state = %state, "Run state written");
        Ok(())
    }
}
