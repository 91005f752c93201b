//! # Book Summary
//!
//! Aggregate view of a ticket book at a given instant: how many tickets sit
//! in each status per region, how many warnings are pending or sent, and
//! which automatic escalations fall due next.
//!
//! The summary is a pure function of `(book, policy, now)` and never changes
//! the book.

use crate::policy::EscalationPolicy;
use crate::{RecordId, Region, Status, TicketBook};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Tickets in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// Per-region aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: Region,
    pub total: usize,
    /// Non-empty statuses in display order.
    pub by_status: Vec<StatusCount>,
    pub pending_warnings: usize,
    pub sent_warnings: usize,
    /// Tickets the policy cannot evaluate for lack of a timestamp.
    pub unanchored: usize,
}

/// An automatic escalation that has not fired yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEscalation {
    pub ticket_id: RecordId,
    pub ticket_number: String,
    pub region: Region,
    pub target: Status,
    pub due: DateTime<Utc>,
    /// True if `due` is already behind `now` (the next run will fire it).
    pub overdue: bool,
}

/// Whole-book aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub generated_at: DateTime<Utc>,
    pub regions: Vec<RegionSummary>,
    pub unread_notifications: usize,
    pub total_notifications: usize,
    /// Sorted by due instant, earliest first.
    pub upcoming: Vec<UpcomingEscalation>,
}

impl BookSummary {
    /// Summarize `book` as of `now`.
    #[must_use]
    pub fn assess(book: &TicketBook, policy: &EscalationPolicy, now: DateTime<Utc>) -> Self {
        let mut regions = Vec::with_capacity(Region::ALL.len());
        let mut upcoming = Vec::new();

        for region in Region::ALL {
            let tickets = book.tickets(region);

            let mut by_status: Vec<StatusCount> = Vec::new();
            for ticket in tickets {
                match by_status.iter_mut().find(|c| c.status == ticket.status) {
                    Some(entry) => entry.count += 1,
                    None => by_status.push(StatusCount {
                        status: ticket.status.clone(),
                        count: 1,
                    }),
                }
            }
            by_status.sort_by_key(|c| c.status.display_rank());

            let anchorless = tickets
                .iter()
                .filter(|t| match &t.status {
                    Status::Warning1Sent => t.warning1_sent_at.is_none(),
                    Status::Warning2Sent => t.warning2_sent_at.is_none(),
                    s if s.is_trackable() || s.pending_warning_level().is_some() => {
                        t.activity_anchor().is_none()
                    }
                    _ => false,
                })
                .count();

            regions.push(RegionSummary {
                region,
                total: tickets.len(),
                by_status,
                pending_warnings: tickets
                    .iter()
                    .filter(|t| t.status.pending_warning_level().is_some())
                    .count(),
                sent_warnings: tickets
                    .iter()
                    .filter(|t| t.status.sent_level().is_some())
                    .count(),
                unanchored: anchorless,
            });

            upcoming.extend(tickets.iter().filter_map(|t| {
                let (target, due) = policy.next_escalation(t)?;
                Some(UpcomingEscalation {
                    ticket_id: t.id.clone(),
                    ticket_number: t.ticket_number.clone(),
                    region,
                    target,
                    due,
                    overdue: due <= now,
                })
            }));
        }

        upcoming.sort_by_key(|u| u.due);

        Self {
            generated_at: now,
            regions,
            unread_notifications: book.unread_count(),
            total_notifications: book.notifications().len(),
            upcoming,
        }
    }

    /// Region entry, if present.
    #[must_use]
    pub fn region(&self, region: Region) -> Option<&RegionSummary> {
        self.regions.iter().find(|r| r.region == region)
    }
}

// =============================================================================
// TESTS
// =============================================================================
