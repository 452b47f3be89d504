use crate::errors::TrackerError;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub fn today() -> String {
    date_key(Local::now().date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(key.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(key.to_string()))
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

// Monday through Sunday of the ISO week containing `key`.
pub fn week_dates(key: &str) -> Result<Vec<String>, TrackerError> {
    let start = week_start(parse_date_key(key)?);
    Ok((0..7)
        .map(|offset| date_key(start + Duration::days(offset)))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SleepDuration {
    pub minutes: u32,
}

impl SleepDuration {
    pub fn hours(&self) -> f64 {
        f64::from(self.minutes) / 60.0
    }
}

impl fmt::Display for SleepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.minutes / 60;
        let minutes = self.minutes % 60;
        if minutes == 0 {
            write!(f, "{hours}h")
        } else {
            write!(f, "{hours}h{minutes}m")
        }
    }
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

// Duration between two `HH:MM` times. An end at or before the start is read
// as the next morning. Empty or malformed input yields `None`.
pub fn sleep_duration(start: &str, end: &str) -> Option<SleepDuration> {
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    let mut diff = (end - start).num_minutes();
    if diff <= 0 {
        diff += 24 * 60;
    }
    u32::try_from(diff).ok().map(|minutes| SleepDuration { minutes })
}

pub fn month_leading_blanks(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.weekday().num_days_from_monday())
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_dates_start_on_monday() {
        let week = week_dates("2024-03-06").unwrap();
        assert_eq!(
            week,
            vec![
                "2024-03-04",
                "2024-03-05",
                "2024-03-06",
                "2024-03-07",
                "2024-03-08",
                "2024-03-09",
                "2024-03-10",
            ]
        );
    }

    #[test]
    fn week_dates_on_sunday_stay_in_same_week() {
        let week = week_dates("2024-03-10").unwrap();
        assert_eq!(week.first().map(String::as_str), Some("2024-03-04"));
        assert_eq!(week.last().map(String::as_str), Some("2024-03-10"));
    }

    #[test]
    fn week_dates_cross_year_boundary() {
        let week = week_dates("2025-01-01").unwrap();
        assert_eq!(week[0], "2024-12-30");
        assert_eq!(week[6], "2025-01-05");
    }

    #[test]
    fn week_dates_reject_bad_key() {
        assert!(week_dates("2024-13-40").is_err());
    }

    #[test]
    fn sleep_crossing_midnight() {
        let span = sleep_duration("23:00", "07:00").unwrap();
        assert_eq!(span.minutes, 8 * 60);
        assert_eq!(span.to_string(), "8h");
    }

    #[test]
    fn sleep_same_day() {
        assert_eq!(sleep_duration("07:00", "23:00").unwrap().minutes, 16 * 60);
    }

    #[test]
    fn sleep_with_minutes_label() {
        let span = sleep_duration("23:30", "07:00").unwrap();
        assert_eq!(span.to_string(), "7h30m");
        assert!((span.hours() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sleep_equal_times_is_a_full_day() {
        assert_eq!(sleep_duration("07:00", "07:00").unwrap().minutes, 24 * 60);
    }

    #[test]
    fn sleep_unset_or_malformed() {
        assert_eq!(sleep_duration("", "07:00"), None);
        assert_eq!(sleep_duration("23:00", ""), None);
        assert_eq!(sleep_duration("late", "07:00"), None);
        assert_eq!(sleep_duration("25:00", "07:00"), None);
    }

    #[test]
    fn month_grid_shape() {
        // 2024-09-01 is a Sunday.
        assert_eq!(month_leading_blanks(2024, 9), Some(6));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 13), None);
    }
}
