//! Timestamp helpers.
//!
//! Challenge expirations travel as RFC3339 strings on the wire; receipts
//! and capability checks use unix seconds.

use chrono::{DateTime, Utc};

/// Current time as an RFC3339 string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Parse an RFC3339 timestamp into unix seconds.
pub fn rfc3339_to_unix(value: &str) -> Option<u64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.timestamp().max(0) as u64)
}

/// Render unix seconds as an RFC3339 string.
pub fn unix_to_rfc3339(secs: u64) -> String {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}
