use crate::utils::constants::STATE_DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date range handed to the external entry point.
///
/// Both bounds are inclusive calendar days. A same-day rerun produces a window
/// whose start lies after its end; that window is reported, never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProcessingWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Number of days covered, zero for an inverted window.
    pub fn day_count(&self) -> i64 {
        if self.is_inverted() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn start_arg(&self) -> String {
        self.start.format(STATE_DATE_FORMAT).to_string()
    }

    pub fn end_arg(&self) -> String {
        self.end.format(STATE_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for ProcessingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_arg(), self.end_arg())
    }
}
