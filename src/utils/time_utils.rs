use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_MIN: i64 = 60;
    pub const SECS_IN_H: i64 = Self::SECS_IN_MIN * 60;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Calendar date (UTC) of a unix timestamp in seconds.
pub fn epoch_sec_to_date(epoch_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec, 0).map(|dt| dt.date_naive())
}

/// Midnight UTC of `date` as unix seconds.
pub fn date_to_epoch_sec(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), TimeUtils::STANDARD_TIME_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// `n` consecutive calendar days beginning at `start` (inclusive).
pub fn consecutive_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    start.iter_days().take(n).collect()
}

/// Same month/day `years` earlier. A Feb 29 anchor falls back to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    let year = date.year() - years as i32;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

/// Exclusive end bound for a provider query: the day after `date`.
pub fn day_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn epoch_round_trip_is_midnight_utc() {
        let date = ymd(2024, 1, 2);
        let secs = date_to_epoch_sec(date);
        assert_eq!(secs, 1_704_153_600);
        assert_eq!(epoch_sec_to_date(secs), Some(date));
        // Market-open timestamps later in the day still land on the same date
        assert_eq!(epoch_sec_to_date(secs + 14 * TimeUtils::SECS_IN_H + 1800), Some(date));
    }

    #[test]
    fn consecutive_days_cross_month_end() {
        let days = consecutive_days(ymd(2024, 2, 27), 4);
        assert_eq!(
            days,
            vec![ymd(2024, 2, 27), ymd(2024, 2, 28), ymd(2024, 2, 29), ymd(2024, 3, 1)]
        );
    }

    #[test]
    fn years_before_handles_leap_day() {
        assert_eq!(years_before(ymd(2024, 2, 29), 1), ymd(2023, 2, 28));
        assert_eq!(years_before(ymd(2025, 6, 15), 3), ymd(2022, 6, 15));
    }

    #[test]
    fn parse_date_rejects_other_layouts() {
        assert_eq!(parse_date(" 2024-01-01 ").unwrap(), ymd(2024, 1, 1));
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
