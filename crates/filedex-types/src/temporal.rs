use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::TypeError;

/// Layout used for every timestamp the scanner writes.
///
/// UTC with a fixed six-digit fraction, so lexical order of the text equals
/// chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Render a filesystem time as record timestamp text.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(TIMESTAMP_FORMAT).to_string()
}

/// Parse record timestamp text.
///
/// The fractional part is optional, so values written by other tools
/// (`2024-01-01T00:00:00`) parse as well.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, TypeError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| TypeError::InvalidTimestamp(format!("{text}: {e}")))
}
