//! Recorded time intervals.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::split::split_at_midnight;
use crate::time::{self, Time};

/// A single recorded time interval.
///
/// Entries without an end are still running. The wall clock stands in for the
/// end whenever one is needed, without touching the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Timewarrior interval id. Not unique once entries are split.
    #[serde(default)]
    pub id: i64,

    /// When the interval started.
    pub start: Time,

    /// When the interval ended, if it has.
    #[serde(
        default,
        deserialize_with = "time::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<Time>,

    /// Tags in recorded order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Entry {
    /// Creates a closed entry without tags.
    pub const fn new(id: i64, start: Time, end: Time) -> Self {
        Self {
            id,
            start,
            end: Some(end),
            tags: Vec::new(),
        }
    }

    /// Creates an entry that is still running.
    pub const fn open(id: i64, start: Time) -> Self {
        Self {
            id,
            start,
            end: None,
            tags: Vec::new(),
        }
    }

    /// Returns true if the entry has no recorded end.
    pub fn is_open(&self) -> bool {
        self.end.is_none_or(|end| end.is_zero())
    }

    /// The recorded end, or the current time for open entries.
    pub fn current_end(&self) -> Time {
        match self.end {
            Some(end) if !end.is_zero() => end,
            _ => Time::now(),
        }
    }

    /// Length of the interval, never negative.
    ///
    /// Entries ending before they start count as zero.
    pub fn duration(&self) -> Duration {
        let end = self.current_end();
        if end < self.start {
            return Duration::zero();
        }
        end - self.start
    }
}

/// Entries in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries(Vec<Entry>);

impl Entries {
    /// Iterates over all entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keeps the entries the predicate accepts, preserving order.
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&Entry) -> bool,
    {
        self.into_iter().filter(predicate).collect()
    }

    /// Splits every entry into single-day entries.
    ///
    /// Split entries keep their id, so ids repeat afterwards. The sum of all
    /// durations does not change.
    #[must_use]
    pub fn split_at_midnight(self) -> Self {
        split_at_midnight(self).collect()
    }
}

impl From<Vec<Entry>> for Entries {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl From<Entries> for Vec<Entry> {
    fn from(entries: Entries) -> Self {
        entries.0
    }
}

impl FromIterator<Entry> for Entries {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Entries {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Parses a timestamp that is known to be valid.
    pub fn t(s: &str) -> Time {
        Time::parse(s).unwrap()
    }

    /// A closed entry with id 0.
    pub fn entry(start: &str, end: &str) -> Entry {
        Entry::new(0, t(start), t(end))
    }
}
