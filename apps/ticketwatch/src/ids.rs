//! Random identifiers for records created by the app.

use ticketwatch_core::{NotificationIds, RecordId};
use uuid::Uuid;

/// UUID v4 notification ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl NotificationIds for UuidIds {
    fn next_id(&mut self) -> RecordId {
        new_record_id()
    }
}

/// A fresh UUID v4 record id (used for tickets).
pub fn new_record_id() -> RecordId {
    RecordId::new(Uuid::new_v4().to_string())
}
