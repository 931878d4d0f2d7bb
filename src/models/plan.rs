use crate::models::{ProcessingWindow, RunState};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Everything a daily run decides before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPlan {
    pub today: NaiveDate,
    pub prior_state: Option<RunState>,
    pub window: ProcessingWindow,
    /// Set when the day advanced since the prior run; holds the log suffix.
    pub rotation_appendix: Option<String>,
    pub next_state: RunState,
}

impl RunPlan {
    pub fn rotation_armed(&self) -> bool {
        self.rotation_appendix.is_some()
    }

    pub fn is_first_run(&self) -> bool {
        self.prior_state.is_none()
    }
}

/// Compute the window and rotation for a run started on `today`.
///
/// The window always ends yesterday. It starts at the prior state when one
/// exists, otherwise yesterday. Rotation is armed only when a prior state
/// exists and differs from today. The next state is always today.
pub fn plan_run(prior: Option<RunState>, today: NaiveDate) -> RunPlan {
    let yesterday = today - Duration::days(1);

    let rotation_appendix = match prior {
        Some(state) if state.date != today => Some(state.rotation_appendix()),
        _ => None,
    };

    let start = prior.map(|state| state.date).unwrap_or(yesterday);

    RunPlan {
        today,
        prior_state: prior,
        window: ProcessingWindow::new(start, yesterday),
        rotation_appendix,
        next_state: RunState::new(today),
    }
}
