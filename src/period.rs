use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};

/// Inclusive reporting window. Search queries use the calendar dates only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Start of the window as a UTC calendar date (`YYYY-MM-DD`).
    pub fn start_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End of the window as a UTC calendar date (`YYYY-MM-DD`).
    pub fn end_date(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Parse a period token into a date range ending now.
///
/// A trailing `d`/`w`/`m` means N days/weeks/months back from now
/// (e.g. `7d`, `3w`, `1m`). A token containing `..` is a literal
/// `YYYY-MM-DD..YYYY-MM-DD` pair. Anything else is an error.
pub fn parse_period(period: &str) -> Result<DateRange> {
    let period = period.trim();
    let now = Utc::now();

    if let Some((start, end)) = period.split_once("..") {
        return Ok(DateRange {
            start: parse_date(start)?,
            end: parse_date(end)?,
        });
    }

    if let Some(n) = period.strip_suffix('d') {
        let days: i64 = n
            .parse()
            .with_context(|| format!("Invalid day count in period '{}'", period))?;
        return Ok(DateRange {
            start: now - Duration::days(days),
            end: now,
        });
    }

    if let Some(n) = period.strip_suffix('w') {
        let weeks: i64 = n
            .parse()
            .with_context(|| format!("Invalid week count in period '{}'", period))?;
        return Ok(DateRange {
            start: now - Duration::weeks(weeks),
            end: now,
        });
    }

    if let Some(n) = period.strip_suffix('m') {
        let months: u32 = n
            .parse()
            .with_context(|| format!("Invalid month count in period '{}'", period))?;
        let start = now
            .checked_sub_months(Months::new(months))
            .with_context(|| format!("Period '{}' reaches before the calendar", period))?;
        return Ok(DateRange { start, end: now });
    }

    bail!(
        "Invalid period format '{}'. Use: 7d, 3w, 1m, or YYYY-MM-DD..YYYY-MM-DD",
        period
    )
}

fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
