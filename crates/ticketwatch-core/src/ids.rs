//! # Notification Identity
//!
//! The policy never invents ids itself; callers inject a generator so tests
//! stay deterministic and the app can use random ids.

use crate::RecordId;

/// Source of fresh, unique notification ids.
pub trait NotificationIds {
    /// Produce the next id. Must not repeat within a data file.
    fn next_id(&mut self) -> RecordId;
}

/// Monotonic counter ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Start counting at 1.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Start counting at `first`.
    #[must_use]
    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl NotificationIds for SequentialIds {
    fn next_id(&mut self) -> RecordId {
        let id = RecordId::new(format!("{}-{}", self.prefix, self.next));
        self.next = self.next.saturating_add(1);
        id
    }
}
