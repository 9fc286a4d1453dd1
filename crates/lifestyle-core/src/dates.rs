//! Calendar helpers shared by the scorer, statistics and store.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::error::ValidationError;

/// Whole days from `from` to `to`, truncated toward zero. Negative when `to`
/// precedes `from`.
pub fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

/// Calendar date of `instant` on a wall clock in `tz`.
pub fn date_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let monday = date - Duration::days(offset);
    (monday, monday + Duration::days(6))
}

/// Whether `date` falls in the Monday–Sunday week containing `anchor`.
pub fn in_same_week(date: NaiveDate, anchor: NaiveDate) -> bool {
    let (start, end) = week_bounds(anchor);
    date >= start && date <= end
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Parse either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as
/// midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Postgres-style "2024-01-01 10:00:00+00"
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = parse_date(trimmed)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_in_follows_the_wall_clock() {
        let late_evening_west = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        let new_york_winter = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            date_in(late_evening_west, &new_york_winter),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            date_in(late_evening_west, &tokyo),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(date_in(late_evening_west, &Utc), late_evening_west.date_naive());
    }

    #[test]
    fn week_bounds_from_midweek() {
        let wed = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let (start, end) = week_bounds(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
    }

    #[test]
    fn week_bounds_on_sunday_look_back_to_monday() {
        let sun = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let (start, end) = week_bounds(sun);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(end, sun);
    }

    #[test]
    fn in_same_week_excludes_previous_sunday() {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let prev_sun = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert!(!in_same_week(prev_sun, anchor));
        assert!(in_same_week(anchor, anchor));
    }

    #[test]
    fn whole_days_truncate() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 3, 23, 0, 0).unwrap();
        assert_eq!(whole_days_between(a, b), 2);
        assert_eq!(whole_days_between(b, a), -2);
    }

    #[test]
    fn parse_timestamp_accepts_bare_date() {
        let dt = parse_timestamp("2024-06-30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-06-30T10:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 30, 8, 0, 0).unwrap());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("30/06/2024").is_err());
    }
}
