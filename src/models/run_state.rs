use crate::utils::constants::STATE_DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Last calendar day for which the daily run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunState {
    pub date: NaiveDate,
}

impl RunState {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Suffix appended to log files rotated away from this day, e.g. `_20240314`.
    pub fn rotation_appendix(&self) -> String {
        format!("_{}", self)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(STATE_DATE_FORMAT))
    }
}

impl FromStr for RunState {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), STATE_DATE_FORMAT)?;
        Ok(Self { date })
    }
}
