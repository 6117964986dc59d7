//! Splitting entries at a daily clock time.
//!
//! An entry crossing the split clock is cut into consecutive sub-entries that
//! share its id and tags. The pieces cover exactly the original interval, so
//! the summed duration does not change.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};

use crate::entry::Entry;
use crate::time::Time;

/// Iterator over the pieces of one entry, see [`split_into_days`].
#[derive(Debug, Clone)]
pub struct SplitIntoDays {
    remainder: Option<Entry>,
    /// End of the original entry, evaluated once.
    end: DateTime<FixedOffset>,
    /// Next instant to cut at.
    split: DateTime<FixedOffset>,
}

/// Cuts an entry at every occurrence of `split_clock` inside it.
///
/// The first cut is at `split_clock` on the start date, in the start's offset,
/// or on the following day if the entry starts at or after that clock time.
/// Cuts then advance one calendar day at a time. An entry ending exactly at a
/// cut is not split there.
///
/// Open entries are split up to the current time; the last piece stays open.
pub fn split_into_days(entry: Entry, split_clock: NaiveTime) -> SplitIntoDays {
    let start = entry.start.instant();
    let end = entry.current_end().instant();

    let mut split = start + (split_clock - start.time());
    if split <= start {
        split += Duration::days(1);
    }

    SplitIntoDays {
        remainder: Some(entry),
        end,
        split,
    }
}

impl Iterator for SplitIntoDays {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let mut entry = self.remainder.take()?;

        if self.end > self.split {
            let cut = Time::from(self.split);
            let before = Entry {
                id: entry.id,
                start: entry.start,
                end: Some(cut),
                tags: entry.tags.clone(),
            };

            entry.start = cut;
            self.split += Duration::days(1);
            self.remainder = Some(entry);

            return Some(before);
        }

        Some(entry)
    }
}

impl std::iter::FusedIterator for SplitIntoDays {}

/// Splits every entry at midnight, keeping input order.
pub fn split_at_midnight<I>(entries: I) -> impl Iterator<Item = Entry>
where
    I: IntoIterator<Item = Entry>,
{
    entries
        .into_iter()
        .flat_map(|entry| split_into_days(entry, NaiveTime::MIN))
}
