//! Lazy operations over entry sequences.

use crate::entry::Entry;

/// Keeps the entries the predicate accepts, lazily and in order.
///
/// The result can be iterated again only if `entries` can.
pub fn filter<I, P>(mut predicate: P, entries: I) -> impl Iterator<Item = Entry>
where
    I: IntoIterator<Item = Entry>,
    P: FnMut(&Entry) -> bool,
{
    entries.into_iter().filter(move |entry| predicate(entry))
}

/// Accepts entries that start and end on the same calendar date.
///
/// Rejected entries are reported at debug level.
pub fn only_single_days(entry: &Entry) -> bool {
    let same_date = entry.start.same_date(&entry.current_end());
    if !same_date {
        tracing::debug!(entry_id = entry.id, "entry spans multiple days, skipping");
    }
    same_date
}
