//! Report table rendering.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use ft_core::DaySums;

use crate::config::ReportConfig;

/// Spaces added to the widest cell of every column.
const COLUMN_PADDING: usize = 4;

/// Formats a duration as `[-]<hours>h:<minutes>m`, truncating seconds.
pub fn fmt_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let abs = duration.abs();
    format!("{sign}{}h:{:02}m", abs.num_hours(), abs.num_minutes() % 60)
}

/// Rows of right-aligned columns.
#[derive(Debug, Default)]
struct Table {
    rows: Vec<[String; 4]>,
}

impl Table {
    fn row(&mut self, handle: &str, actual: &str, target: &str, diff: &str) {
        self.rows.push([
            handle.to_string(),
            actual.to_string(),
            target.to_string(),
            diff.to_string(),
        ]);
    }

    fn time_row(&mut self, handle: &str, actual: Duration, target: Duration) {
        self.row(
            handle,
            &fmt_duration(actual),
            &fmt_duration(target),
            &fmt_duration(actual - target),
        );
    }

    fn render(&self, output: &mut String) {
        let mut widths = [0; 4];
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count() + COLUMN_PADDING);
            }
        }

        for row in &self.rows {
            for (width, cell) in widths.iter().zip(row) {
                write!(output, "{cell:>width$}").unwrap();
            }
            output.push('\n');
        }
    }
}

/// Renders the report for the given day sums.
///
/// Day rows and the offset row only appear in verbose mode; the total row
/// always does.
pub fn format_report(config: &ReportConfig, sums: &DaySums) -> Result<String> {
    let mut table = Table::default();
    table.row("date", "actual", "target", "diff");

    if config.verbose && config.offset != Duration::zero() {
        table.time_row("offset", config.offset, Duration::zero());
    }

    let mut total_actual = config.offset;
    let mut total_target = Duration::zero();

    for (day, sum) in sums.sorted() {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .with_context(|| format!("parse date [{day}]"))?;
        let target = config.targets.target_for(date);

        total_actual += *sum;
        total_target += target;

        if config.verbose {
            table.time_row(day, *sum, target);
        }
    }

    table.time_row("total", total_actual, total_target);

    let mut output = String::from("\n");
    table.render(&mut output);
    Ok(output)
}

/// Writes the report to `output`.
pub fn print_sums(output: &mut impl Write, config: &ReportConfig, sums: &DaySums) -> Result<()> {
    let report = format_report(config, sums)?;
    output
        .write_all(report.as_bytes())
        .context("write report")?;
    output.flush().context("flush")
}

#[cfg(test)]
mod tests {
    use super::*;

    use ft_core::AggregationStrategy;
    use insta::assert_snapshot;

    use crate::config::TimeTargets;

    fn report_config(verbose: bool, offset: Duration) -> ReportConfig {
        ReportConfig {
            targets: TimeTargets::new(Duration::hours(8)),
            offset,
            strategy: AggregationStrategy::default(),
            debug: false,
            verbose,
        }
    }

    fn sums(days: &[(&str, i64)]) -> DaySums {
        days.iter()
            .map(|(day, minutes)| ((*day).to_string(), Duration::minutes(*minutes)))
            .collect()
    }

    #[test]
    fn test_fmt_duration() {
        assert_eq!(fmt_duration(Duration::zero()), "0h:00m");
        assert_eq!(fmt_duration(Duration::seconds(59)), "0h:00m");
        assert_eq!(fmt_duration(Duration::minutes(90)), "1h:30m");
        assert_eq!(fmt_duration(Duration::minutes(-70)), "-1h:10m");
        assert_eq!(fmt_duration(Duration::seconds(-59)), "-0h:00m");
        assert_eq!(fmt_duration(Duration::hours(32)), "32h:00m");
        assert_eq!(
            fmt_duration(-(Duration::hours(14) + Duration::seconds(21))),
            "-14h:00m"
        );
    }

    #[test]
    fn quiet_report_only_has_total() {
        let report = format_report(
            &report_config(false, Duration::hours(1)),
            &sums(&[("2024-06-29", 0), ("2024-06-30", 119)]),
        )
        .unwrap();

        assert_eq!(
            report,
            "\n     date    actual     target        diff\n    total    2h:59m    16h:00m    -13h:01m\n"
        );
    }

    #[test]
    fn verbose_report_lists_days_and_offset() {
        let report = format_report(
            &report_config(true, Duration::minutes(90)),
            &sums(&[("2024-06-30", 119), ("2024-06-29", 0)]),
        )
        .unwrap();

        assert_eq!(
            report,
            concat!(
                "\n",
                "          date    actual     target        diff\n",
                "        offset    1h:30m     0h:00m      1h:30m\n",
                "    2024-06-29    0h:00m     8h:00m     -8h:00m\n",
                "    2024-06-30    1h:59m     8h:00m     -6h:01m\n",
                "         total    3h:29m    16h:00m    -12h:31m\n",
            )
        );
    }

    #[test]
    fn zero_offset_row_is_omitted() {
        let report = format_report(&report_config(true, Duration::zero()), &sums(&[])).unwrap();
        assert_snapshot!(report.trim_start_matches('\n').replace(' ', "."), @r"
        .....date....actual....target......diff
        ....total....0h:00m....0h:00m....0h:00m
        ");
    }

    #[test]
    fn targets_follow_weekday_settings() {
        let mut config = report_config(true, Duration::zero());
        // 2024-06-29 is a Saturday.
        config
            .targets
            .weekdays
            .insert(chrono::Weekday::Sat, Duration::zero());

        let report = format_report(&config, &sums(&[("2024-06-29", 30)])).unwrap();
        assert!(report.contains("2024-06-29    0h:30m    0h:00m    0h:30m\n"), "{report}");
    }

    #[test]
    fn invalid_day_key_is_an_error() {
        let err = format_report(&report_config(true, Duration::zero()), &sums(&[("someday", 1)]))
            .unwrap_err();
        assert!(err.to_string().starts_with("parse date [someday]"), "{err}");
    }

    #[test]
    fn print_sums_writes_report() {
        let mut output = Vec::new();
        print_sums(
            &mut output,
            &report_config(false, Duration::zero()),
            &sums(&[("2024-06-29", 480)]),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "\n     date    actual    target      diff\n    total    8h:00m    8h:00m    0h:00m\n"
        );
    }
}
