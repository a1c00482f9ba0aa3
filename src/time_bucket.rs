//! Time helpers for progression records
//!
//! Timestamps are stored as Unix milliseconds. Day buckets ("YYYY-MM-DD") are
//! computed in local time, because "once per day" rewards follow the player's
//! calendar, not UTC.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Current time as Unix milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Local day bucket for a point in time, formatted "YYYY-MM-DD".
pub fn day_bucket<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d").to_string()
}

/// Parse a day bucket back to a date.
pub fn parse_day_bucket(bucket: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(bucket, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bucket_formats_date() {
        let at = Utc.with_ymd_and_hms(2023, 12, 28, 12, 34, 56).unwrap();
        assert_eq!(day_bucket(&at), "2023-12-28");
    }

    #[test]
    fn test_parse_day_bucket() {
        let date = parse_day_bucket("2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_day_bucket("2023-02-30").is_none());
        assert!(parse_day_bucket("yesterday").is_none());
    }
}
