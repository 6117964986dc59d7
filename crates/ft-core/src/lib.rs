//! Core logic for timewarrior report extensions.
//!
//! This crate contains:
//! - Input handling: the configuration section and the JSON entry list
//! - Entries: recorded intervals with open-ended semantics
//! - Splitting: cutting entries at a daily clock time
//! - Grouping: folding entries into keyed aggregates
//! - Strategies: named ways of turning entries into per-day sums

pub mod config;
mod entry;
pub mod group;
mod reader;
pub mod split;
mod strategy;
pub mod stream;
mod time;

pub use config::{Config, ConfigError, ConfigKey, ConfigValue};
pub use entry::{Entries, Entry};
pub use group::{Groups, group};
pub use reader::{Reader, ReaderError, read_entries};
pub use split::{split_at_midnight, split_into_days};
pub use strategy::{
    AggregationStrategy, DaySums, UnknownStrategy, end_date, start_date, sum_duration,
};
pub use stream::{filter, only_single_days};
pub use time::{Time, TimeError};
