use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Naive datetime layouts accepted in addition to RFC 3339, interpreted as UTC
const NAIVE_DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 timestamp
///
/// Accepts RFC 3339 (`2024-01-15T10:00:00Z`, offsets allowed), a datetime
/// without offset (taken as UTC), or a bare date (`2024-01-15`, UTC midnight).
///
/// # Examples
///
/// ```
/// use workbench_ops::utils::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-15").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-01-15T00:00:00+00:00");
/// assert!(parse_timestamp("not-a-date").is_none());
/// ```
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = input.parse::<DateTime<Utc>>() {
        return Some(ts);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read a timestamp out of a JSON value: a string in any [`parse_timestamp`]
/// layout, or an integer number of Unix milliseconds
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// `2024-01-15T10:00:00.000Z`
pub fn format_iso_millis(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
