use crate::error::Result;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path a log is moved to when rotated: the appendix glued onto the file name.
pub fn rotated_path(path: &Path, appendix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(appendix);
    PathBuf::from(name)
}

/// Rename an existing log out of the way. Absent logs are left alone.
pub fn rotate_log(path: &Path, appendix: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let target = rotated_path(path, appendix);
    fs::rename(path, &target)?;
    info!(from = %path.display(), to = %target.display(), "Rotated log");

    Ok(Some(target))
}
