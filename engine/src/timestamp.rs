//! Fail-soft timestamp interpretation.
//!
//! Snapshots carry their last-writer timestamp as an opaque string.
//! Interpretation happens at comparison time and is total: a missing or
//! unparseable timestamp reads as the Unix epoch, so mangled metadata loses
//! to any intact timestamp instead of aborting reconciliation.

use crate::EpochMillis;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Epoch milliseconds for a raw timestamp string.
///
/// Accepts RFC 3339, an offset-less datetime (read as UTC), or a bare date
/// (midnight UTC). Anything else, including `None`, reads as `0`. Pre-epoch
/// timestamps come back negative and simply compare as very old.
pub fn parse_epoch_ms(raw: Option<&str>) -> EpochMillis {
    let Some(raw) = raw else { return 0 };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.timestamp_millis();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Utc.from_utc_datetime(&naive).timestamp_millis();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Utc.from_utc_datetime(&naive).timestamp_millis();
        }
    }

    0
}

/// Canonical RFC 3339 rendering for freshly stamped timestamps.
pub fn format_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
