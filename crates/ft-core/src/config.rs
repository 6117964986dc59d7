//! The configuration section of timewarrior extension input.
//!
//! Timewarrior passes its configuration as `key: value` lines terminated by a
//! blank line. Keys are dotted paths such as `flextime.time_per_day.monday`.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::num::ParseIntError;
use std::sync::LazyLock;

use chrono::Duration;
use regex::Regex;
use thiserror::Error;

const KEY_SEPARATOR: &str = ".";
const LINE_SEPARATOR: &str = ": ";

/// Values timewarrior treats as true.
const TRUE_VALUES: [&str; 5] = ["on", "1", "yes", "y", "true"];

/// A full duration string, e.g. `-1h30m` or `1.5h`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$").unwrap()
});

/// One `<number><unit>` component of a duration string.
static DURATION_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|μs|ms|s|m|h)").unwrap()
});

/// Errors from reading or interpreting the configuration section.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration lines before the blank line.
    #[error("config is empty")]
    Empty,

    /// A line that does not split into exactly one key and one value.
    #[error("config line has invalid format: [{line}]")]
    InvalidLine { line: String },

    /// A value that should be an integer.
    #[error("invalid integer \"{value}\"")]
    InvalidInt {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A value that should be a duration.
    #[error("invalid duration \"{value}\"")]
    InvalidDuration { value: String },

    /// Reading the input failed.
    #[error("read line: {0}")]
    Io(#[from] io::Error),
}

/// A dotted configuration key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Well known global keys.
    pub const VERBOSE: &'static str = "verbose";
    pub const DEBUG: &'static str = "debug";
    pub const CONFIRMATION: &'static str = "confirmation";

    /// Joins the parts with `.`.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<S> = parts.into_iter().collect();
        let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
        Self(parts.join(KEY_SEPARATOR))
    }

    /// Returns the part of the key below `prefix`.
    ///
    /// A key equal to the prefix has the empty sub key. Only whole segments
    /// match: `partial` is not below `part`.
    pub fn sub_key(&self, prefix: &Self) -> Option<Self> {
        if self == prefix {
            return Some(Self::default());
        }
        self.0
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_prefix(KEY_SEPARATOR))
            .map(Self::from)
    }

    /// The dotted key as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// True for `on`, `1`, `yes`, `y` and `true`; everything else is false.
    pub fn as_bool(&self) -> bool {
        TRUE_VALUES.contains(&self.0.as_str())
    }

    /// Parses the value as a signed integer.
    pub fn as_int(&self) -> Result<i64, ConfigError> {
        self.0.parse().map_err(|source| ConfigError::InvalidInt {
            value: self.0.clone(),
            source,
        })
    }

    /// Parses durations like `8h`, `90m`, `-1h30m` or `1.5h`.
    pub fn as_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.0)
    }

    /// The raw value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a signed sequence of `<number><unit>` components.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is the
/// only unitless value accepted.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let unsigned = s.trim_start_matches(['-', '+']);
    if unsigned == "0" && s.len() - unsigned.len() <= 1 {
        return Ok(Duration::zero());
    }
    if !DURATION_RE.is_match(s) {
        return Err(invalid());
    }

    let mut nanos: i64 = 0;
    for caps in DURATION_PART_RE.captures_iter(unsigned) {
        let unit_nanos = match &caps[2] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            _ => return Err(invalid()),
        };
        let part = component_nanos(&caps[1], unit_nanos).ok_or_else(invalid)?;
        nanos = nanos.checked_add(part).ok_or_else(invalid)?;
    }

    if s.starts_with('-') {
        nanos = -nanos;
    }
    Ok(Duration::nanoseconds(nanos))
}

/// Converts `<int>.<frac>` of a unit into nanoseconds.
fn component_nanos(number: &str, unit_nanos: i64) -> Option<i64> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;

    // Digits beyond nanosecond precision of an hour do not matter.
    let frac = &frac[..frac.len().min(18)];
    if !frac.is_empty() {
        let digits: i128 = frac.parse().ok()?;
        let scale = 10_i128.pow(u32::try_from(frac.len()).ok()?);
        let part = i64::try_from(digits * i128::from(unit_nanos) / scale).ok()?;
        nanos = nanos.checked_add(part)?;
    }

    Some(nanos)
}

/// Configuration directives by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config(HashMap<ConfigKey, ConfigValue>);

impl Config {
    /// Value of a dotted key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(&ConfigKey::from(key))
    }

    /// Value of an already built key.
    pub fn get_key(&self, key: &ConfigKey) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Value of a boolean flag; missing keys are false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(ConfigValue::as_bool)
    }

    /// Sets a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<ConfigKey>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Entries whose key lies below `prefix`, with the sub key.
    pub fn below<'a>(
        &'a self,
        prefix: &'a ConfigKey,
    ) -> impl Iterator<Item = (ConfigKey, &'a ConfigValue)> + 'a {
        self.0
            .iter()
            .filter_map(move |(key, value)| key.sub_key(prefix).map(|sub| (sub, value)))
    }

    /// All directives, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &ConfigValue)> {
        self.0.iter()
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no directives.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<ConfigKey>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reads `key: value` lines up to the first blank line or end of input.
pub fn read_config<R: BufRead>(reader: &mut R) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            break;
        }

        let (key, value) = read_config_line(trimmed)?;
        config.insert(key, value);
    }

    if config.is_empty() {
        return Err(ConfigError::Empty);
    }

    Ok(config)
}

fn read_config_line(line: &str) -> Result<(ConfigKey, ConfigValue), ConfigError> {
    match line.split_once(LINE_SEPARATOR) {
        Some((key, value)) if !value.contains(LINE_SEPARATOR) => Ok((key.into(), value.into())),
        _ => Err(ConfigError::InvalidLine {
            line: line.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn new_joins_parts() {
        assert_eq!(ConfigKey::new(Vec::<&str>::new()).as_str(), "");
        assert_eq!(ConfigKey::new(["f"]).as_str(), "f");
        assert_eq!(ConfigKey::new(["a", "b", "c"]).as_str(), "a.b.c");
    }

    #[test]
    fn sub_key_matches_whole_segments() {
        let cases = [
            ("", "", Some("")),
            ("a", "", None),
            (".a", "", Some("a")),
            ("", "z", None),
            ("a", "a", Some("")),
            ("a.b", "a", Some("b")),
            ("a.b.c", "a", Some("b.c")),
            ("a.b", "b", None),
            ("partial", "part", None),
        ];

        for (key, prefix, expected) in cases {
            let actual = ConfigKey::from(key).sub_key(&ConfigKey::from(prefix));
            assert_eq!(
                actual.as_ref().map(ConfigKey::as_str),
                expected,
                "is {key:?} below {prefix:?}?"
            );
        }
    }

    #[test]
    fn bool_values() {
        for input in ["", "f", "false", "0", "True", "off", "no"] {
            assert!(!ConfigValue::from(input).as_bool(), "{input:?}");
        }
        for input in ["true", "on", "1", "yes", "y"] {
            assert!(ConfigValue::from(input).as_bool(), "{input:?}");
        }
    }

    #[test]
    fn int_values() {
        assert_eq!(ConfigValue::from("42").as_int().unwrap(), 42);
        assert_eq!(ConfigValue::from("-3").as_int().unwrap(), -3);
        assert!(ConfigValue::from("").as_int().is_err());
        assert!(ConfigValue::from("4.2").as_int().is_err());
        assert!(ConfigValue::from("forty").as_int().is_err());
    }

    #[test]
    fn duration_values() {
        let cases = [
            ("0", Duration::zero()),
            ("-0", Duration::zero()),
            ("8h", Duration::hours(8)),
            ("90m", Duration::minutes(90)),
            ("-70m", Duration::minutes(-70)),
            ("+15s", Duration::seconds(15)),
            ("1h30m", Duration::minutes(90)),
            ("1.5h", Duration::minutes(90)),
            (".5m", Duration::seconds(30)),
            ("2h0m0s", Duration::hours(2)),
            ("300ms", Duration::milliseconds(300)),
            ("1us", Duration::microseconds(1)),
            ("1µs", Duration::microseconds(1)),
            ("10ns", Duration::nanoseconds(10)),
            ("1m1ms", Duration::minutes(1) + Duration::milliseconds(1)),
        ];

        for (input, expected) in cases {
            let actual = ConfigValue::from(input).as_duration().unwrap();
            assert_eq!(actual, expected, "{input:?}");
        }
    }

    #[test]
    fn invalid_durations() {
        for input in ["", "a lot", "nothing", "8", "h", "8 h", "8hours", "--8h", "8h-", "1d"] {
            let err = ConfigValue::from(input).as_duration().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidDuration { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn read_config_until_blank_line() {
        let mut input = Cursor::new(
            "verbose: on\nflextime.time_per_day: 4h\n\n[{\"id\":1}]\n",
        );
        let config = read_config(&mut input).unwrap();

        assert_eq!(config.len(), 2);
        assert!(config.flag(ConfigKey::VERBOSE));
        assert!(!config.flag(ConfigKey::DEBUG));
        assert_eq!(config.get("flextime.time_per_day").unwrap().as_str(), "4h");

        let mut rest = String::new();
        std::io::Read::read_to_string(&mut input, &mut rest).unwrap();
        assert_eq!(rest, "[{\"id\":1}]\n");
    }

    #[test]
    fn read_config_until_end_of_input() {
        let mut input = Cursor::new("flextime.aggregation_strategy: broken");
        let config = read_config(&mut input).unwrap();
        assert_eq!(
            config.get("flextime.aggregation_strategy").unwrap().as_str(),
            "broken"
        );
    }

    #[test]
    fn read_config_handles_crlf() {
        let mut input = Cursor::new("debug: yes\r\n\r\n");
        let config = read_config(&mut input).unwrap();
        assert!(config.flag("debug"));
    }

    #[test]
    fn read_config_empty() {
        assert!(matches!(
            read_config(&mut Cursor::new("")),
            Err(ConfigError::Empty)
        ));
        assert!(matches!(
            read_config(&mut Cursor::new("\n[]")),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn read_config_invalid_lines() {
        for input in ["novalue\n", "key:value\n", "a: b: c\n", "[\n"] {
            let err = read_config(&mut Cursor::new(input)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidLine { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn empty_values_are_kept() {
        let config = read_config(&mut Cursor::new("temp.report.start: \n\n")).unwrap();
        assert_eq!(config.get("temp.report.start").unwrap().as_str(), "");
    }

    #[test]
    fn below_lists_sub_keys() {
        let config: Config = [
            ("flextime.time_per_day.date.2025-10-31", "1h"),
            ("flextime.time_per_day.date.2025-11-01", "2h"),
            ("flextime.time_per_day.monday", "3h"),
            ("flextime.time_per_day", "8h"),
        ]
        .into_iter()
        .collect();
        let prefix = ConfigKey::new(["flextime", "time_per_day", "date"]);

        let mut found: Vec<(String, String)> = config
            .below(&prefix)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        found.sort();

        assert_eq!(
            found,
            vec![
                ("2025-10-31".to_string(), "1h".to_string()),
                ("2025-11-01".to_string(), "2h".to_string()),
            ]
        );
    }
}
