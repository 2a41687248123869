use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const INVALID_DATE: &str = "Invalid Date";

const TIME_FORMAT: &str = "%-I:%M:%S %p";
const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Parse a backend timestamp into local time.
///
/// RFC 3339 first; a bare `YYYY-MM-DDTHH:MM:SS[.f]` without offset is read as
/// local wall-clock time. A date-only `YYYY-MM-DD` is UTC midnight, the way
/// browsers treat it.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local.from_local_datetime(&naive).earliest();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(&Local))
}

/// Local time of day, e.g. `4:26:40 PM`.
pub fn format_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// Local calendar date, e.g. `5/29/2024`.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}
