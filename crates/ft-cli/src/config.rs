//! Report settings: defaults, `FLEXTIME_*` environment and timewarrior config.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use figment::Figment;
use figment::providers::{Env, Serialized};
use ft_core::{AggregationStrategy, Config, ConfigKey, ConfigValue};
use serde::{Deserialize, Deserializer, Serialize};

use crate::printer::fmt_duration;

/// Prefix of all timewarrior config keys read by this extension.
pub const KEY_PREFIX: &str = "flextime";

const ENV_PREFIX: &str = "FLEXTIME_";

const TIME_PER_DAY: &str = "time_per_day";
const OFFSET_TOTAL: &str = "offset_total";
const AGGREGATION_STRATEGY: &str = "aggregation_strategy";
const DATE_OVERRIDE: &str = "date";

const SETTING_KEYS: [&str; 3] = [TIME_PER_DAY, OFFSET_TOTAL, AGGREGATION_STRATEGY];

const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

/// Raw scalar settings before interpretation.
///
/// Values stay strings so that every source is parsed the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(deserialize_with = "lenient_string")]
    pub time_per_day: String,

    #[serde(deserialize_with = "lenient_string")]
    pub offset_total: String,

    #[serde(deserialize_with = "lenient_string")]
    pub aggregation_strategy: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_per_day: "8h".to_string(),
            offset_total: "0".to_string(),
            aggregation_strategy: AggregationStrategy::default().to_string(),
        }
    }
}

impl Settings {
    /// Resolves settings from defaults, `FLEXTIME_*` variables and `config`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load(config: &Config) -> Result<Self, figment::Error> {
        Self::load_with_env(config, Env::prefixed(ENV_PREFIX))
    }

    /// Like [`Settings::load`], reading the given environment provider.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_with_env(config: &Config, env: Env) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(env.only(&SETTING_KEYS));

        // Timewarrior config wins over the environment.
        for name in SETTING_KEYS {
            if let Some(value) = config.get_key(&ConfigKey::new([KEY_PREFIX, name])) {
                figment = figment.merge(Serialized::default(name, value.as_str()));
            }
        }

        figment.extract()
    }
}

/// Accepts strings as well as the numbers and booleans environment values may
/// be parsed into.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}

/// Daily time targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTargets {
    pub default: Duration,
    pub weekdays: HashMap<Weekday, Duration>,
    pub dates: HashMap<NaiveDate, Duration>,
}

impl TimeTargets {
    /// Targets with only a default.
    pub fn new(default: Duration) -> Self {
        Self {
            default,
            weekdays: HashMap::new(),
            dates: HashMap::new(),
        }
    }

    /// Reads weekday targets and date overrides below
    /// `flextime.time_per_day`.
    pub fn from_config(default: Duration, config: &Config) -> Result<Self> {
        let mut targets = Self::new(default);

        for (weekday, name) in WEEKDAYS {
            let key = ConfigKey::new([KEY_PREFIX, TIME_PER_DAY, name]);
            let Some(value) = config.get_key(&key) else {
                continue;
            };
            let target = value
                .as_duration()
                .with_context(|| format!("get target for {name}"))?;
            targets.weekdays.insert(weekday, target);
        }

        let override_key = ConfigKey::new([KEY_PREFIX, TIME_PER_DAY, DATE_OVERRIDE]);
        for (sub_key, value) in config.below(&override_key) {
            let date = NaiveDate::parse_from_str(sub_key.as_str(), "%Y-%m-%d")
                .with_context(|| format!("get date for override [{sub_key}]"))?;
            let target = value
                .as_duration()
                .with_context(|| format!("get target for {date}"))?;
            targets.dates.insert(date, target);
        }

        Ok(targets)
    }

    /// Target for a date: its override, else its weekday's, else the default.
    pub fn target_for(&self, date: NaiveDate) -> Duration {
        self.dates
            .get(&date)
            .or_else(|| self.weekdays.get(&date.weekday()))
            .copied()
            .unwrap_or(self.default)
    }
}

impl fmt::Display for TimeTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "default: {}", fmt_duration(self.default))?;

        for (weekday, name) in WEEKDAYS {
            if let Some(target) = self.weekdays.get(&weekday) {
                write!(f, ", {name}: {}", fmt_duration(*target))?;
            }
        }

        let mut dates: Vec<_> = self.dates.iter().collect();
        dates.sort_unstable();
        for (date, target) in dates {
            write!(f, ", {date}: {}", fmt_duration(*target))?;
        }

        Ok(())
    }
}

/// Fully interpreted report configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub targets: TimeTargets,
    pub offset: Duration,
    pub strategy: AggregationStrategy,
    pub debug: bool,
    pub verbose: bool,
}

impl ReportConfig {
    /// Interprets the timewarrior config, resolving scalar settings through
    /// [`Settings::load`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = Settings::load(config).context("load settings")?;
        Self::from_settings(config, &settings)
    }

    /// Interprets already resolved settings plus the per-day keys of `config`.
    pub fn from_settings(config: &Config, settings: &Settings) -> Result<Self> {
        let default = ConfigValue::from(settings.time_per_day.as_str())
            .as_duration()
            .context("get default target")
            .context("get time target")?;
        let targets = TimeTargets::from_config(default, config).context("get time target")?;

        let offset = ConfigValue::from(settings.offset_total.as_str())
            .as_duration()
            .context("get total offset")?;

        let strategy = settings
            .aggregation_strategy
            .parse::<AggregationStrategy>()
            .context("get aggregation strategy")?;

        Ok(Self {
            targets,
            offset,
            strategy,
            debug: config.flag(ConfigKey::DEBUG),
            verbose: config.flag(ConfigKey::VERBOSE),
        })
    }
}
