use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid artifact pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Invalid run state in {path}: {content:?}")]
    InvalidState { path: PathBuf, content: String },

    #[error("Dispatch for '{target}' failed: {reason}")]
    DispatchFailed { target: String, reason: String },
}
