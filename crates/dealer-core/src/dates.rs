//! # Dates
//!
//! Parsing of the date strings the backend returns and the day arithmetic
//! built on them.
//!
//! ## Timezone Policy: UTC
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                              Calendar date used                  │
//! │  ─────────────────────────────────  ─────────────────────────────────   │
//! │  "2026-03-05"                       2026-03-05                          │
//! │  "2026-03-05T23:30:00Z"             2026-03-05                          │
//! │  "2026-03-06T01:30:00+07:00"        2026-03-05  (converted to UTC)      │
//! │  "2026-03-05T10:00:00" (naive)      2026-03-05  (read as UTC)           │
//! │  1772668800000 (epoch ms)           2026-03-05                          │
//! │                                                                         │
//! │  The same input gives the same answer on every machine.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::types::Period;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO 8601 date or date-time into a UTC instant.
///
/// Date-only strings map to midnight UTC. Returns `None` for anything else.
pub fn parse_datetime_utc(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// UTC calendar date of an ISO 8601 string.
pub fn parse_date_utc(input: &str) -> Option<NaiveDate> {
    parse_datetime_utc(input).map(|dt| dt.date_naive())
}

/// UTC calendar date of an untyped JSON field: ISO string or epoch millis.
pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_utc(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

/// Label of the bucket `date` falls in.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use dealer_core::dates::period_label;
/// use dealer_core::Period;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
/// assert_eq!(period_label(date, Period::Day), "2026-03-05");
/// assert_eq!(period_label(date, Period::Month), "2026-03");
/// assert_eq!(period_label(date, Period::Year), "2026");
/// ```
pub fn period_label(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format("%Y-%m-%d").to_string(),
        Period::Month => date.format("%Y-%m").to_string(),
        Period::Year => date.format("%Y").to_string(),
    }
}

/// Whole calendar days an invoice is past due, measured in UTC at `now`.
///
/// Returns 0 when there is no due date, the due date is today or later, or
/// the due date does not parse.
pub fn overdue_days_at(due_date: Option<&str>, now: DateTime<Utc>) -> i64 {
    let Some(due) = due_date.and_then(parse_date_utc) else {
        return 0;
    };

    (now.date_naive() - due).num_days().max(0)
}

/// [`overdue_days_at`] against the current time.
pub fn overdue_days(due_date: Option<&str>) -> i64 {
    overdue_days_at(due_date, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(s: &str) -> DateTime<Utc> {
        parse_datetime_utc(s).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(parse_date_utc("2026-03-05"), Some(expected));
        assert_eq!(parse_date_utc("2026-03-05T23:30:00Z"), Some(expected));
        assert_eq!(parse_date_utc("2026-03-06T01:30:00+07:00"), Some(expected));
        assert_eq!(parse_date_utc("2026-03-05T10:00:00"), Some(expected));
        assert_eq!(parse_date_utc("2026-03-05 10:00"), Some(expected));
        assert_eq!(parse_date_utc("05/03/2026"), None);
        assert_eq!(parse_date_utc(""), None);
    }

    #[test]
    fn test_date_from_epoch_millis() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(date_from_value(&json!(1_772_668_800_000_i64)), Some(expected));
        assert_eq!(date_from_value(&json!(null)), None);
    }

    #[test]
    fn test_overdue_days() {
        let now = at("2026-10-18T10:00:00Z");

        assert_eq!(overdue_days_at(None, now), 0);
        assert_eq!(overdue_days_at(Some("2026-10-18"), now), 0);
        assert_eq!(overdue_days_at(Some("2026-10-25"), now), 0);
        assert_eq!(overdue_days_at(Some("2026-10-17"), now), 1);
        assert_eq!(overdue_days_at(Some("2026-09-18"), now), 30);
        assert_eq!(overdue_days_at(Some("not a date"), now), 0);
    }

    #[test]
    fn test_overdue_days_ignores_time_of_day() {
        let late_evening = at("2026-10-18T23:59:59Z");
        assert_eq!(overdue_days_at(Some("2026-10-17T23:00:00Z"), late_evening), 1);
    }
}
