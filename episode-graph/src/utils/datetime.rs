//! DateTime helpers for timestamps written to and read back from Neo4j.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a timestamp as Neo4j renders it with `toString()` into UTC.
///
/// Accepted shapes:
/// 1. RFC 3339 with `Z` or an offset, any sub-second precision:
///    `"2024-01-15T10:30:00.000000000Z"`, `"2024-01-15T10:30:00+05:00"`
/// 2. Offset followed by a named zone: `"2024-01-15T10:30:00+01:00[Europe/Paris]"`
/// 3. Local datetime without zone (taken as UTC): `"2024-01-15T10:30:00.123"`
/// 4. Date only (midnight UTC): `"2024-01-15"`
///
/// Returns `None` for empty input or anything else, so callers never see a
/// half-parsed value.
pub fn parse_store_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Named zone ids are informational once an offset is present.
    let s = match s.find('[') {
        Some(idx) if s.ends_with(']') => &s[..idx],
        _ => s,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&ndt));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|nd| nd.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Format a [`DateTime<Utc>`] for Cypher's `datetime()` function.
///
/// Output format: `"2024-01-15T10:30:00.000000000Z"` (nanosecond precision, UTC).
pub fn format_neo4j_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string()
}
