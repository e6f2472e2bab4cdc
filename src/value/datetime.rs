//! Date/time cell parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A date-time layout tried against a cell.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeFormat {
    pub pattern: &'static str,
    pub example: &'static str,
    /// The layout ends in a literal `Z` UTC marker.
    pub utc_marker: bool,
}

/// Layouts tried in order; the first match wins.
///
/// `%.f` accepts an absent fraction too, so the fractional layouts also match
/// whole seconds.
pub const DATETIME_FORMATS: &[DateTimeFormat] = &[
    DateTimeFormat {
        pattern: "%Y-%m-%d %H:%M:%S%.f",
        example: "2024-01-02 15:04:05.123",
        utc_marker: false,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%d %H:%M:%S%.fZ",
        example: "2024-01-02 15:04:05.123Z",
        utc_marker: true,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%.f",
        example: "2024-01-02T15:04:05.123",
        utc_marker: false,
    },
    DateTimeFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%.fZ",
        example: "2024-01-02T15:04:05.123Z",
        utc_marker: true,
    },
];

/// Date-only layout, tried after every date-time layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The zero time: midnight, January 1st of year 1, UTC.
pub fn zero_datetime() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::default())
        .and_utc()
}

/// Parse a trimmed, non-blank cell.
///
/// Zone-less values are read as UTC, date-only values become midnight UTC.
/// Values carrying an explicit RFC 3339 offset (the form arrays are stored
/// in) are converted to UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format.pattern) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::default()).and_utc());
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
