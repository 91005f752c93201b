//! # Escalation Policy
//!
//! Decides a single ticket's next status from its current state and "now".
//!
//! ## Rules
//!
//! 1. `Warning 1 Sent` → `Pending Warning 2` once 2 business days have passed
//!    since `warning1SentAt`.
//! 2. `Warning 2 Sent` → `Pending Warning 3` once 3 business days have passed
//!    since `warning2SentAt`.
//! 3. `Warning 3 Sent` is terminal.
//! 4. Trackable and `Pending Warning N` tickets are measured from their last
//!    activity (`lastModified` → `warningTrackingStart` → `createdAt`):
//!    - 2+ business days and not yet pending: enter `Pending Warning 1`,
//!      remembering the previous status.
//!    - under 2 business days while pending: withdraw the warning and restore
//!      the remembered status (or `Pending Customer Response`).
//! 5. Any other status passes through untouched.
//!
//! Sent states re-anchor the clock for each hop because an operator confirmed
//! them; pending states are provisional and share the activity anchor.
//!
//! The policy is a pure function of `(ticket, now)` apart from the ids it
//! draws. It does not remember what it already reported: callers apply each
//! evaluation once and store the new status, which is what stops the same
//! escalation from firing again.

use crate::calendar::BusinessCalendar;
use crate::ids::NotificationIds;
use crate::primitives::{
    DEFAULT_DE_ESCALATION_STATUS, WARNING_1_THRESHOLD_DAYS, WARNING_2_THRESHOLD_DAYS,
    WARNING_3_THRESHOLD_DAYS,
};
use crate::{Notification, Status, Ticket};
use chrono::{DateTime, Utc};

/// What an evaluation did to the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Status and pre-warning status stay as they are.
    Unchanged,
    /// Moved forward to `Pending Warning N`.
    Escalated(u8),
    /// A provisional warning was withdrawn.
    DeEscalated,
    /// The ticket lacks the timestamp its rule is anchored on; nothing done.
    MissingAnchor,
}

/// Result of evaluating one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: Status,
    pub pre_warning_status: Option<Status>,
    pub notifications: Vec<Notification>,
    pub transition: Transition,
}

impl Evaluation {
    fn keep(ticket: &Ticket, transition: Transition) -> Self {
        Self {
            status: ticket.status.clone(),
            pre_warning_status: ticket.pre_warning_status.clone(),
            notifications: Vec::new(),
            transition,
        }
    }

    /// True if applying this evaluation would alter `ticket`.
    #[must_use]
    pub fn changes(&self, ticket: &Ticket) -> bool {
        self.status != ticket.status || self.pre_warning_status != ticket.pre_warning_status
    }
}

/// Message attached to an escalation notification.
#[must_use]
pub fn escalation_message(ticket_number: &str, level: u8) -> String {
    format!("Ticket #{} escalated to Pending Warning {}", ticket_number, level)
}

/// The warning escalation state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationPolicy {
    calendar: BusinessCalendar,
}

impl EscalationPolicy {
    /// Create a policy that counts business days with `calendar`.
    #[must_use]
    pub const fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    /// The calendar thresholds are measured with.
    #[must_use]
    pub const fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// Evaluate `ticket` at `now`.
    pub fn evaluate(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
        ids: &mut dyn NotificationIds,
    ) -> Evaluation {
        match &ticket.status {
            Status::Warning1Sent => self.evaluate_sent(
                ticket,
                ticket.warning1_sent_at,
                WARNING_2_THRESHOLD_DAYS,
                2,
                now,
                ids,
            ),
            Status::Warning2Sent => self.evaluate_sent(
                ticket,
                ticket.warning2_sent_at,
                WARNING_3_THRESHOLD_DAYS,
                3,
                now,
                ids,
            ),
            Status::Warning3Sent => Evaluation::keep(ticket, Transition::Unchanged),
            status if status.is_trackable() || status.pending_warning_level().is_some() => {
                self.evaluate_activity(ticket, now, ids)
            }
            _ => Evaluation::keep(ticket, Transition::Unchanged),
        }
    }

    /// Next automatic escalation this ticket is heading for, with the instant
    /// it becomes due. `None` for pending, terminal and passthrough states.
    #[must_use]
    pub fn next_escalation(&self, ticket: &Ticket) -> Option<(Status, DateTime<Utc>)> {
        let (anchor, days, level) = match &ticket.status {
            Status::Warning1Sent => (ticket.warning1_sent_at?, WARNING_2_THRESHOLD_DAYS, 2),
            Status::Warning2Sent => (ticket.warning2_sent_at?, WARNING_3_THRESHOLD_DAYS, 3),
            status if status.is_trackable() => {
                (ticket.activity_anchor()?, WARNING_1_THRESHOLD_DAYS, 1)
            }
            _ => return None,
        };
        let target = Status::pending_warning(level)?;
        let due = self.calendar.add_business_days(anchor, days)?;
        Some((target, due))
    }

    /// Rules 1 and 2: a sent warning ripens into the next pending level.
    fn evaluate_sent(
        &self,
        ticket: &Ticket,
        sent_at: Option<DateTime<Utc>>,
        threshold: u32,
        next_level: u8,
        now: DateTime<Utc>,
        ids: &mut dyn NotificationIds,
    ) -> Evaluation {
        let Some(sent_at) = sent_at else {
            return Evaluation::keep(ticket, Transition::MissingAnchor);
        };

        if self.calendar.count_business_days(sent_at, now) < threshold {
            return Evaluation::keep(ticket, Transition::Unchanged);
        }

        match Status::pending_warning(next_level) {
            Some(status) => Evaluation {
                status,
                pre_warning_status: ticket.pre_warning_status.clone(),
                notifications: vec![escalation_notice(ticket, next_level, now, ids)],
                transition: Transition::Escalated(next_level),
            },
            None => Evaluation::keep(ticket, Transition::Unchanged),
        }
    }

    /// Rule 4: first-hop escalation and withdrawal, measured from activity.
    fn evaluate_activity(
        &self,
        ticket: &Ticket,
        now: DateTime<Utc>,
        ids: &mut dyn NotificationIds,
    ) -> Evaluation {
        let Some(anchor) = ticket.activity_anchor() else {
            return Evaluation::keep(ticket, Transition::MissingAnchor);
        };

        let elapsed = self.calendar.count_business_days(anchor, now);
        let pending = ticket.status.pending_warning_level().is_some();

        if elapsed >= WARNING_1_THRESHOLD_DAYS && !pending {
            return Evaluation {
                status: Status::PendingWarning1,
                pre_warning_status: Some(ticket.status.clone()),
                notifications: vec![escalation_notice(ticket, 1, now, ids)],
                transition: Transition::Escalated(1),
            };
        }

        if elapsed < WARNING_1_THRESHOLD_DAYS && pending {
            return Evaluation {
                status: ticket
                    .pre_warning_status
                    .clone()
                    .unwrap_or(DEFAULT_DE_ESCALATION_STATUS),
                pre_warning_status: None,
                notifications: Vec::new(),
                transition: Transition::DeEscalated,
            };
        }

        Evaluation::keep(ticket, Transition::Unchanged)
    }
}

fn escalation_notice(
    ticket: &Ticket,
    level: u8,
    now: DateTime<Utc>,
    ids: &mut dyn NotificationIds,
) -> Notification {
    Notification {
        id: ids.next_id(),
        ticket_number: ticket.ticket_number.clone(),
        region: ticket.region,
        message: escalation_message(&ticket.ticket_number, level),
        timestamp: Some(now),
        read: false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
