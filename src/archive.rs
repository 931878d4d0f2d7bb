use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveReport {
    pub copied: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    /// Matches that already are the archived copy.
    pub skipped: Vec<PathBuf>,
}

impl ArchiveReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Copies run artifacts matching a glob into a flat archive directory.
pub struct ArtifactArchiver {
    pattern: String,
    destination: PathBuf,
}

impl ArtifactArchiver {
    pub fn new(pattern: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            destination: destination.into(),
        }
    }

    /// Copy every matching file, overwriting name collisions.
    ///
    /// Only an unparsable pattern is an error; unreadable entries, copy
    /// failures and an empty match set are logged and skipped. A match that
    /// is its own archived copy is left untouched.
    pub fn archive(&self) -> Result<ArchiveReport> {
        let entries = glob::glob(&self.pattern)?;
        let mut report = ArchiveReport::default();

        if let Err(e) = fs::create_dir_all(&self.destination) {
            warn!(destination = %self.destination.display(), error = %e, "Cannot create archive directory");
            report.failed = entries
                .map(|entry| entry.unwrap_or_else(|e| e.path().to_path_buf()))
                .filter(|path| !path.is_dir())
                .collect();
            return Ok(report);
        }

        for entry in entries {
            let source = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "Unreadable artifact entry");
                    report.failed.push(e.path().to_path_buf());
                    continue;
                }
            };

            if !source.is_file() {
                continue;
            }

            let Some(file_name) = source.file_name() else {
                continue;
            };
            let dest = self.destination.join(file_name);

            if is_same_file(&source, &dest) {
                warn!(artifact = %source.display(), "Artifact is already the archived copy");
                report.skipped.push(source);
                continue;
            }

            match fs::copy(&source, &dest) {
                Ok(_) => {
                    debug!(from = %source.display(), to = %dest.display(), "Archived artifact");
                    report.copied.push(dest);
                }
                Err(e) => {
                    warn!(artifact = %source.display(), error = %e, "Failed to archive artifact");
                    report.failed.push(source);
                }
            }
        }

        if report.is_empty() {
            warn!(pattern = %self.pattern, "No artifacts matched");
        } else {
            info!(
                copied = report.copied.len(),
                failed = report.failed.len(),
                skipped = report.skipped.len(),
                destination = %self.destination.display(),
                "Artifacts archived"
            );
        }

        Ok(report)
    }
}

/// Copying a file onto itself truncates it.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
