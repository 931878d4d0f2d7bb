pub mod command;
pub mod runner;

pub use command::{ProcessingCommand, WindowArgs};
pub use runner::{DispatchOutcome, DispatchStatus, Dispatcher};

use serde::{Deserialize, Serialize};

/// What the daily run does after a dispatch that did not exit cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Log the failure and carry on with the next target.
    #[default]
    ContinueOnError,
    /// Abort the run, skipping remaining dispatches and archiving.
    StopOnError,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::ContinueOnError => write!(f, "continue-on-error"),
            ErrorPolicy::StopOnError => write!(f, "stop-on-error"),
        }
    }
}
