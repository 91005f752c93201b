//! Timestamp parsing shared by the persisted format and operator input.
//!
//! Canonical form is RFC 3339 in UTC with millisecond precision. The
//! allowlist below also accepts the zone-less `YYYY-MM-DDTHH:MM[:SS]` shape
//! that datetime-local form fields produce; those are read as wall-clock time
//! in the zone the caller supplies.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp, interpreting zone-less input in `assume`.
///
/// Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, assume: &Tz) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_zone_less(trimmed, assume)
}

/// Parse only the zone-less shapes, as wall-clock time in `zone`.
///
/// A wall-clock time repeated by a DST change resolves to its earlier
/// instant; one skipped by a DST change is `None`.
#[must_use]
pub(crate) fn parse_zone_less<Tz: TimeZone>(raw: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(trimmed, fmt).ok()?;
        zone.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Canonical persisted form.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `Option<DateTime<Utc>>` fields that must never fail a
/// whole document load.
///
/// Accepts RFC 3339 strings, zone-less strings and epoch milliseconds.
/// Anything else, including `null`, becomes `None`. Zone-less strings are
/// read as UTC here; `book_from_json` resolves them in the data file's zone
/// before this adapter sees them.
pub mod lenient {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => parse_timestamp(&s, &Utc),
            Some(serde_json::Value::Number(n)) => {
                n.as_i64().and_then(DateTime::from_timestamp_millis)
            }
            _ => None,
        })
    }
}
