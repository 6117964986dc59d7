//! Aggregation strategies: how entries become per-day sums.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::entry::{Entries, Entry};
use crate::group::{Groups, group};
use crate::stream::only_single_days;

/// Summed durations keyed by `YYYY-MM-DD`.
pub type DaySums = Groups<String, Duration>;

/// Named combination of a transform, a key function and a reducer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AggregationStrategy {
    /// Drops entries spanning more than one date, keyed by start date.
    #[default]
    SingleDayOnly,
    /// Counts whole entries towards their start date.
    IntoStartDate,
    /// Counts whole entries towards their end date.
    IntoEndDate,
    /// Splits entries at midnight, each piece counted towards its own date.
    SplitAtMidnight,
}

impl AggregationStrategy {
    /// All built-in strategies.
    pub const ALL: [Self; 4] = [
        Self::SingleDayOnly,
        Self::IntoStartDate,
        Self::IntoEndDate,
        Self::SplitAtMidnight,
    ];

    /// Configuration name of the strategy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SingleDayOnly => "single-day-only",
            Self::IntoStartDate => "into-start-date",
            Self::IntoEndDate => "into-end-date",
            Self::SplitAtMidnight => "split-at-midnight",
        }
    }

    /// Prepares entries for grouping.
    pub fn transform(self, entries: Entries) -> Entries {
        match self {
            Self::SingleDayOnly => entries.filter(only_single_days),
            Self::IntoStartDate | Self::IntoEndDate => entries,
            Self::SplitAtMidnight => entries.split_at_midnight(),
        }
    }

    /// Group key for an entry.
    pub fn key(self, entry: &Entry) -> String {
        match self {
            Self::IntoEndDate => end_date(entry),
            Self::SingleDayOnly | Self::IntoStartDate | Self::SplitAtMidnight => start_date(entry),
        }
    }

    /// Folds an entry into a day's sum.
    pub fn value(self, sum: Duration, entry: &Entry) -> Duration {
        sum_duration(sum, entry)
    }

    /// Transforms and groups entries into per-day sums.
    pub fn aggregate(self, entries: Entries) -> DaySums {
        group(
            self.transform(entries),
            |entry| self.key(entry),
            |sum, entry| self.value(sum, entry),
        )
    }
}

/// Start date of the entry in its recorded offset.
pub fn start_date(entry: &Entry) -> String {
    entry.start.date_string()
}

/// End date of the entry; open entries end now.
pub fn end_date(entry: &Entry) -> String {
    entry.current_end().date_string()
}

/// Adds the entry's duration to the running sum.
pub fn sum_duration(sum: Duration, entry: &Entry) -> Duration {
    sum + entry.duration()
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregationStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

impl Serialize for AggregationStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AggregationStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error for unrecognized aggregation strategy names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(String);

impl UnknownStrategy {
    /// The rejected name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aggregation strategy: {}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}
