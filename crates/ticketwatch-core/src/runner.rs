//! # Escalation Runner
//!
//! Applies the [`EscalationPolicy`] to a whole ticket collection.
//!
//! The input slice is never mutated. Tickets whose status or pre-warning
//! status moved are returned as updated copies, all others are carried over
//! unchanged, and notifications are collected in ticket order.

use crate::calendar::BusinessCalendar;
use crate::ids::NotificationIds;
use crate::policy::{EscalationPolicy, Transition};
use crate::{Notification, RecordId, Ticket};
use chrono::{DateTime, FixedOffset, Utc};

/// Output of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// The full collection after the run, in input order.
    pub updated_tickets: Vec<Ticket>,
    /// Notifications raised by this run, in ticket order.
    pub new_notifications: Vec<Notification>,
    /// Ids of tickets whose state moved.
    pub changed: Vec<RecordId>,
    /// Ids of tickets skipped for lack of a usable timestamp.
    pub skipped: Vec<RecordId>,
}

impl BatchOutcome {
    /// True if the run altered nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.new_notifications.is_empty()
    }
}

/// Batch driver for the escalation policy.
///
/// By default the business calendar follows the offset of the `now` each run
/// receives; `with_offset` pins it instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationRunner {
    offset: Option<FixedOffset>,
}

impl EscalationRunner {
    /// Runner whose calendar follows `now`'s offset.
    #[must_use]
    pub const fn new() -> Self {
        Self { offset: None }
    }

    /// Runner whose calendar always uses `offset`.
    #[must_use]
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// The pinned offset, if any.
    #[must_use]
    pub const fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The policy a run at `now` evaluates with.
    #[must_use]
    pub fn policy_at(&self, now: &DateTime<FixedOffset>) -> EscalationPolicy {
        let calendar = match self.offset {
            Some(offset) => BusinessCalendar::new(offset),
            None => BusinessCalendar::for_now(now),
        };
        EscalationPolicy::new(calendar)
    }

    /// Evaluate every ticket at `now`.
    pub fn run_batch(
        &self,
        tickets: &[Ticket],
        now: &DateTime<FixedOffset>,
        ids: &mut dyn NotificationIds,
    ) -> BatchOutcome {
        let policy = self.policy_at(now);
        let instant = now.with_timezone(&Utc);
        let mut outcome = BatchOutcome {
            updated_tickets: Vec::with_capacity(tickets.len()),
            ..BatchOutcome::default()
        };

        for ticket in tickets {
            let evaluation = policy.evaluate(ticket, instant, ids);

            if evaluation.transition == Transition::MissingAnchor {
                outcome.skipped.push(ticket.id.clone());
            }

            if evaluation.changes(ticket) {
                outcome.changed.push(ticket.id.clone());
                outcome.updated_tickets.push(Ticket {
                    status: evaluation.status,
                    pre_warning_status: evaluation.pre_warning_status,
                    ..ticket.clone()
                });
            } else {
                outcome.updated_tickets.push(ticket.clone());
            }

            outcome.new_notifications.extend(evaluation.notifications);
        }

        outcome
    }
}

/// Evaluate every ticket at `now` with a calendar in `now`'s offset.
pub fn run_batch(
    tickets: &[Ticket],
    now: &DateTime<FixedOffset>,
    ids: &mut dyn NotificationIds,
) -> BatchOutcome {
    EscalationRunner::new().run_batch(tickets, now, ids)
}

// =============================================================================
// TESTS
// =============================================================================
