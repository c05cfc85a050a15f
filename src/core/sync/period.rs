//! Extraction period selection
//!
//! Decides the `enrolledAfter` cutoff for origin queries. Scheduled runs
//! use `today` (the trailing 24 hours); `this-week` and `all-time` exist
//! for catch-up runs, and an explicit date overrides the named periods.

use crate::domain::errors::SyncError;
use crate::domain::Result;
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Lower bound for `all-time` extraction. Predates any DHIS2 deployment.
const ALL_TIME_EPOCH: (i32, u32, u32) = (1900, 1, 1);

/// How far back to look for new enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Enrollments from the trailing 24 hours (the scheduled default).
    Today,
    /// Enrollments since Monday of the current week.
    ThisWeek,
    /// Every enrollment the origin holds.
    AllTime,
    /// Enrollments since an explicit date.
    Custom(NaiveDate),
}

impl Period {
    /// Resolve the period to an inclusive start date, given today's date.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Today => today - Duration::days(1),
            Period::ThisWeek => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            Period::AllTime => {
                let (y, m, d) = ALL_TIME_EPOCH;
                NaiveDate::from_ymd_opt(y, m, d).unwrap_or(today)
            }
            Period::Custom(date) => *date,
        }
    }

    /// Build a period from a named selector plus an optional explicit date.
    /// The date, when present, takes precedence over the selector.
    pub fn from_selection(selector: &str, date: Option<NaiveDate>) -> Result<Self> {
        match date {
            Some(date) => Ok(Period::Custom(date)),
            None => selector.parse(),
        }
    }
}

impl FromStr for Period {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "today" => Ok(Period::Today),
            "this-week" => Ok(Period::ThisWeek),
            "all-time" => Ok(Period::AllTime),
            other => Err(SyncError::Configuration(format!(
                "Unknown period '{}'. Valid periods: today, this-week, all-time",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Today => write!(f, "today"),
            Period::ThisWeek => write!(f, "this-week"),
            Period::AllTime => write!(f, "all-time"),
            Period::Custom(date) => write!(f, "{}", date),
        }
    }
}
