//! Timestamp parsing and display formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display precision used by the range label.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accepted wall-clock layouts, tried in order after RFC 3339.
/// Slash dates are month-first; day-first slash dates are only tried once
/// every month-first layout has failed.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M:%S %p",
    "%d-%m-%Y %I:%M %p",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d-%b-%Y %I:%M:%S %p",
    "%d-%b-%Y %I:%M %p",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%b-%Y"];

/// Parse a `Timestamp` cell into an absolute point in time.
///
/// Offset-bearing values keep their own wall-clock time. Returns `None` for
/// anything that does not match one of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .chain(DAY_FIRST_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format to minute precision (`YYYY-MM-DD HH:MM`).
pub fn format_minute(ts: &NaiveDateTime) -> String {
    ts.format(MINUTE_FORMAT).to_string()
}

/// Seconds since the Unix epoch, used as the plot x coordinate.
pub fn to_plot_x(ts: &NaiveDateTime) -> f64 {
    let utc = ts.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_millis()) / 1000.0
}

/// Inverse of [`to_plot_x`], formatted with the given chrono pattern.
pub fn format_plot_x(x: f64, fmt: &str) -> String {
    DateTime::from_timestamp(x.floor() as i64, 0)
        .map(|dt| dt.naive_utc().format(fmt).to_string())
        .unwrap_or_default()
}
