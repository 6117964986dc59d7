//! Timestamps in the timewarrior wire format.
//!
//! Timewarrior writes instants as `YYYYMMDDTHHMMSS` followed by either `Z` or a
//! signed two-digit hour offset, e.g. `20240630T143940Z` or `20240630T163940+02`.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Layout of the date and clock part, without the zone suffix.
const DATE_TIME_FMT: &str = "%Y%m%dT%H%M%S";

/// Length of the date and clock part.
const DATE_TIME_LEN: usize = 15;

/// Position of the `T` separator.
const SEPARATOR_POS: usize = 8;

const SECONDS_PER_HOUR: i32 = 3600;

/// Unix timestamp of `0001-01-01T00:00:00Z`.
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

/// Errors from parsing timewarrior timestamps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The input does not follow the timewarrior layout.
    #[error("parse time \"{input}\": expected YYYYMMDDTHHMMSS followed by Z or +hh/-hh")]
    Invalid { input: String },
}

/// An instant with the fixed UTC offset it was recorded in.
///
/// Ordering and equality compare absolute instants. Calendar questions
/// ([`Time::same_date`], [`Time::date`]) use the recorded offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<FixedOffset>);

impl Time {
    /// Parses a timestamp in the timewarrior layout.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::Invalid {
            input: s.to_string(),
        };

        let (Some(date_time), Some(zone)) = (s.get(..DATE_TIME_LEN), s.get(DATE_TIME_LEN..)) else {
            return Err(invalid());
        };

        // chrono accepts fewer digits per field than timewarrior writes
        let layout_ok = date_time.char_indices().all(|(i, c)| {
            if i == SEPARATOR_POS {
                c == 'T'
            } else {
                c.is_ascii_digit()
            }
        });
        if !layout_ok {
            return Err(invalid());
        }

        let naive =
            NaiveDateTime::parse_from_str(date_time, DATE_TIME_FMT).map_err(|_| invalid())?;
        let offset = parse_zone(zone).ok_or_else(invalid)?;
        let time = naive
            .and_local_timezone(offset)
            .single()
            .ok_or_else(invalid)?;

        Ok(Self(time))
    }

    /// The current wall-clock time in the local offset.
    pub fn now() -> Self {
        Self(Local::now().fixed_offset())
    }

    /// Returns true only for the zero instant `0001-01-01T00:00:00Z`.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Compares the calendar dates as recorded, each in its own offset.
    ///
    /// Two instants on the same UTC day may differ here when their offsets
    /// differ, and vice versa.
    pub fn same_date(&self, other: &Self) -> bool {
        self.date() == other.date()
    }

    /// Calendar date in the recorded offset.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Calendar date formatted as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    /// The underlying chrono value.
    pub const fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    if zone == "Z" {
        return FixedOffset::east_opt(0);
    }

    let mut chars = zone.chars();
    let sign = match chars.next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let hours = chars.as_str();
    if hours.len() != 2 || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;

    FixedOffset::east_opt(sign * hours * SECONDS_PER_HOUR)
}

impl Default for Time {
    fn default() -> Self {
        let zero = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(ZERO_UNIX_SECONDS);
        Self(zero.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Time {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl Sub for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0.signed_duration_since(rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_TIME_FMT))?;

        let offset = self.0.offset().local_minus_utc();
        if offset == 0 {
            return write!(f, "Z");
        }
        let sign = if offset < 0 { '-' } else { '+' };
        write!(f, "{sign}{:02}", offset.abs() / SECONDS_PER_HOUR)
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TimeVisitor;

impl Visitor<'_> for TimeVisitor {
    type Value = Time;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timewarrior timestamp string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Time::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TimeVisitor)
    }
}

/// Deserializes an optional end time.
///
/// A missing field, `null` and the empty string all mean "still open".
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Time>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Time::parse(&s).map(Some).map_err(de::Error::custom),
    }
}
