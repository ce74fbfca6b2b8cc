use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Analytics window selectable by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AnalyticsPeriod {
    #[default]
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "alltime")]
    AllTime,
}

impl AnalyticsPeriod {
    pub const ALL: [AnalyticsPeriod; 3] = [
        AnalyticsPeriod::Last7Days,
        AnalyticsPeriod::Last30Days,
        AnalyticsPeriod::AllTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Last7Days => "last7days",
            AnalyticsPeriod::Last30Days => "last30days",
            AnalyticsPeriod::AllTime => "alltime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Last7Days => "Last 7 days",
            AnalyticsPeriod::Last30Days => "Last 30 days",
            AnalyticsPeriod::AllTime => "All time",
        }
    }

    /// Length of a fixed window in days, `None` for all time.
    pub fn days(&self) -> Option<i64> {
        match self {
            AnalyticsPeriod::Last7Days => Some(7),
            AnalyticsPeriod::Last30Days => Some(30),
            AnalyticsPeriod::AllTime => None,
        }
    }

    /// Lenient parse: anything unrecognised selects the last seven days.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Inclusive calendar window ending today.
    ///
    /// The fixed windows start at the beginning of the day `N` days before
    /// `now`, so a seven day window covers eight calendar dates.
    pub fn window(&self, now: NaiveDateTime) -> DateWindow {
        let today = now.date();
        let start = match self.days() {
            Some(days) => (now - Duration::days(days)).date(),
            None => NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
        };
        DateWindow { start, end: today }
    }
}

impl fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        AnalyticsPeriod::ALL
            .iter()
            .copied()
            .find(|period| period.as_str() == needle)
            .ok_or_else(|| format!("unknown period `{}`", s.trim()))
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
