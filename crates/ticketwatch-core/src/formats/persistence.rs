//! # Persistence Format
//!
//! JSON document holding the whole [`TicketBook`]:
//!
//! ```json
//! { "eu": [Ticket], "global": [Ticket], "notifications": [Notification] }
//! ```
//!
//! Field names are camelCase and timestamps are RFC 3339 strings. Readers
//! accept the looser shapes older files carry (numeric ids, zone-less or
//! epoch-millisecond timestamps, missing collections); writers always emit
//! the canonical form.
//!
//! Zone-less timestamps are wall-clock readings typed into a form. They are
//! resolved in the zone the reader passes in, so a file written by hand in
//! Bucharest keeps its instants when it is loaded and saved again.
//!
//! ## Limits
//!
//! Input larger than [`MAX_DATA_FILE_SIZE`] is rejected before parsing.

use crate::types::timestamp::{format_timestamp, parse_zone_less};
use crate::{TicketBook, TicketwatchError};
use chrono::TimeZone;
use serde_json::{Map, Value};

/// Maximum accepted size of a data file.
pub const MAX_DATA_FILE_SIZE: usize = 64 * 1024 * 1024; // 64 MiB

/// Ticket fields holding timestamps.
const TICKET_TIMESTAMP_FIELDS: [&str; 5] = [
    "createdAt",
    "lastModified",
    "warningTrackingStart",
    "warning1SentAt",
    "warning2SentAt",
];

/// Parse a data file, reading zone-less timestamps as wall-clock time in
/// `zone`.
///
/// Empty or whitespace-only input yields an empty book. Each ticket's
/// `region` is forced to match the collection it was stored in.
///
/// This is a pure transformation - no file I/O.
pub fn book_from_json<Tz: TimeZone>(
    bytes: &[u8],
    zone: &Tz,
) -> Result<TicketBook, TicketwatchError> {
    if bytes.len() > MAX_DATA_FILE_SIZE {
        return Err(TicketwatchError::DeserializationError(format!(
            "Data too large: {} bytes exceeds maximum of {} bytes",
            bytes.len(),
            MAX_DATA_FILE_SIZE
        )));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(TicketBook::new());
    }

    let mut doc: Value = serde_json::from_slice(bytes)
        .map_err(|e| TicketwatchError::DeserializationError(e.to_string()))?;
    resolve_zone_less_timestamps(&mut doc, zone);

    let mut book: TicketBook = serde_json::from_value(doc)
        .map_err(|e| TicketwatchError::DeserializationError(e.to_string()))?;
    book.normalize_regions();
    Ok(book)
}

/// Rewrite zone-less timestamp strings in place as canonical UTC.
fn resolve_zone_less_timestamps<Tz: TimeZone>(doc: &mut Value, zone: &Tz) {
    for collection in ["eu", "global"] {
        for ticket in records_mut(doc, collection) {
            for field in TICKET_TIMESTAMP_FIELDS {
                resolve_field(ticket, field, zone);
            }
        }
    }
    for notification in records_mut(doc, "notifications") {
        resolve_field(notification, "timestamp", zone);
    }
}

fn records_mut<'a>(
    doc: &'a mut Value,
    collection: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    doc.get_mut(collection)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn resolve_field<Tz: TimeZone>(record: &mut Map<String, Value>, field: &str, zone: &Tz) {
    if let Some(Value::String(raw)) = record.get_mut(field) {
        if let Some(ts) = parse_zone_less(raw, zone) {
            *raw = format_timestamp(&ts);
        }
    }
}

/// Serialize a book as pretty-printed JSON with a trailing newline.
///
/// This is a pure transformation - no file I/O.
pub fn book_to_json(book: &TicketBook) -> Result<Vec<u8>, TicketwatchError> {
    let mut bytes = serde_json::to_vec_pretty(book)
        .map_err(|e| TicketwatchError::SerializationError(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

// =============================================================================
// TESTS
// =============================================================================
