// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and UTC calendar-day arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Midnight UTC at the start of `day`.
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Half-open `[start, end)` bounds of the UTC calendar day containing `now`.
pub fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day_start(now.date_naive());
    (start, start + Duration::days(1))
}

/// Midnight UTC of the most recent Monday (today, if today is Monday).
pub fn last_monday(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let days_since_monday = today.weekday().num_days_from_monday() as i64;
    day_start(today - Duration::days(days_since_monday))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_z_suffix() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn test_utc_day_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
        let (start, end) = utc_day_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_last_monday() {
        // 2024-01-17 is a Wednesday.
        let wednesday = Utc.with_ymd_and_hms(2024, 1, 17, 8, 0, 0).unwrap();
        assert_eq!(
            last_monday(wednesday),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );

        let monday = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(
            last_monday(monday),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );

        // Sunday belongs to the week that started six days earlier.
        let sunday = Utc.with_ymd_and_hms(2024, 1, 21, 22, 0, 0).unwrap();
        assert_eq!(
            last_monday(sunday),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
    }
}
