//! # Ticket Book
//!
//! The in-memory state of a Ticketwatch data file: one ticket collection per
//! region plus a flat notification list, and every operator action on them.
//!
//! All operations are synchronous and take "now" as an argument. An edit to
//! `lastModified` is applied and re-evaluated in one call, so the escalation
//! check always sees the post-edit ticket.

use crate::ids::NotificationIds;
use crate::primitives::{MAX_NOTE_LENGTH, MAX_TICKET_NUMBER_LENGTH, MAX_TITLE_LENGTH};
use crate::runner::EscalationRunner;
use crate::{Notification, RecordId, Region, Severity, Status, Ticket, TicketwatchError};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Fields supplied when a ticket is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub ticket_number: String,
    pub title: String,
    pub label: String,
    pub severity: Severity,
    pub region: Region,
    pub status: Status,
    /// Explicit last activity; defaults to the creation instant.
    pub last_modified: Option<DateTime<Utc>>,
}

impl NewTicket {
    /// A ticket in `Pending Initial Contact` with medium severity.
    #[must_use]
    pub fn new(region: Region, ticket_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ticket_number: ticket_number.into(),
            title: title.into(),
            label: String::new(),
            severity: Severity::default(),
            region,
            status: Status::PendingInitialContact,
            last_modified: None,
        }
    }
}

/// Field edits. `None` leaves a field alone; an empty `note` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketEdit {
    pub title: Option<String>,
    pub label: Option<String>,
    pub severity: Option<Severity>,
    pub note: Option<String>,
    pub has_draft_email: Option<bool>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl TicketEdit {
    /// True if the edit touches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// Result of [`TicketBook::edit_ticket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The ticket as stored after the edit and any re-evaluation.
    pub ticket: Ticket,
    /// True if the edit moved the escalation anchor and was re-evaluated.
    pub re_evaluated: bool,
    /// Notifications raised by the re-evaluation (already stored).
    pub notifications: Vec<Notification>,
}

/// Per-region part of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    pub region: Region,
    pub evaluated: usize,
    pub changed: Vec<RecordId>,
    pub skipped: Vec<RecordId>,
}

/// Result of an escalation pass over the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub regions: Vec<RegionReport>,
    /// Notifications raised by the pass (already stored, newest first block).
    pub notifications: Vec<Notification>,
}

impl RunReport {
    /// Number of tickets whose state moved.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.regions.iter().map(|r| r.changed.len()).sum()
    }

    /// Number of tickets skipped for lack of a usable timestamp.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.regions.iter().map(|r| r.skipped.len()).sum()
    }
}

// =============================================================================
// TICKET BOOK
// =============================================================================

/// Tickets per region and the shared notification list.
///
/// Serializes to the persisted document shape
/// `{ "eu": [...], "global": [...], "notifications": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBook {
    #[serde(default)]
    eu: Vec<Ticket>,
    #[serde(default)]
    global: Vec<Ticket>,
    /// Newest first.
    #[serde(default)]
    notifications: Vec<Notification>,
}

impl TicketBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets of one region, in insertion order.
    #[must_use]
    pub fn tickets(&self, region: Region) -> &[Ticket] {
        match region {
            Region::Eu => &self.eu,
            Region::Global => &self.global,
        }
    }

    fn tickets_mut(&mut self, region: Region) -> &mut Vec<Ticket> {
        match region {
            Region::Eu => &mut self.eu,
            Region::Global => &mut self.global,
        }
    }

    /// Total number of tickets across regions.
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.eu.len() + self.global.len()
    }

    /// Look up a ticket by id in either region.
    #[must_use]
    pub fn ticket(&self, id: &RecordId) -> Option<&Ticket> {
        self.eu.iter().chain(&self.global).find(|t| &t.id == id)
    }

    fn ticket_mut(&mut self, id: &RecordId) -> Result<&mut Ticket, TicketwatchError> {
        self.eu
            .iter_mut()
            .chain(self.global.iter_mut())
            .find(|t| &t.id == id)
            .ok_or_else(|| TicketwatchError::TicketNotFound(id.clone()))
    }

    /// Force every ticket's `region` to match the collection holding it.
    ///
    /// Returns how many tickets were corrected.
    pub fn normalize_regions(&mut self) -> usize {
        let mut fixed = 0;
        for region in Region::ALL {
            for ticket in self.tickets_mut(region) {
                if ticket.region != region {
                    ticket.region = region;
                    fixed += 1;
                }
            }
        }
        fixed
    }

    // -------------------------------------------------------------------------
    // Ticket lifecycle
    // -------------------------------------------------------------------------

    /// Create a ticket. `createdAt` and `warningTrackingStart` are `now`;
    /// `lastModified` is the supplied value or `now`.
    pub fn add_ticket(
        &mut self,
        draft: NewTicket,
        id: RecordId,
        now: DateTime<Utc>,
    ) -> Result<&Ticket, TicketwatchError> {
        let ticket_number = draft.ticket_number.trim().to_string();
        let title = draft.title.trim().to_string();
        let label = draft.label.trim().to_string();
        if ticket_number.is_empty() || title.is_empty() {
            return Err(TicketwatchError::InvalidInput(
                "Ticket number and title are required".to_string(),
            ));
        }
        validate_length("ticket number", &ticket_number, MAX_TICKET_NUMBER_LENGTH)?;
        validate_length("title", &title, MAX_TITLE_LENGTH)?;
        validate_length("label", &label, MAX_TITLE_LENGTH)?;
        if self.ticket(&id).is_some() {
            return Err(TicketwatchError::InvalidInput(format!(
                "Duplicate ticket id: {}",
                id
            )));
        }

        let ticket = Ticket {
            id,
            ticket_number,
            title,
            label,
            severity: draft.severity,
            region: draft.region,
            status: draft.status,
            created_at: Some(now),
            last_modified: Some(draft.last_modified.unwrap_or(now)),
            warning_tracking_start: Some(now),
            warning1_sent_at: None,
            warning2_sent_at: None,
            pre_warning_status: None,
            note: None,
            has_draft_email: false,
        };

        let tickets = self.tickets_mut(draft.region);
        let index = tickets.len();
        tickets.push(ticket);
        Ok(&tickets[index])
    }

    /// Remove a ticket. Its notifications stay.
    pub fn delete_ticket(&mut self, id: &RecordId) -> Result<Ticket, TicketwatchError> {
        for region in Region::ALL {
            let tickets = self.tickets_mut(region);
            if let Some(pos) = tickets.iter().position(|t| &t.id == id) {
                return Ok(tickets.remove(pos));
            }
        }
        Err(TicketwatchError::TicketNotFound(id.clone()))
    }

    /// Manual status change.
    ///
    /// Re-anchors `lastModified` and `warningTrackingStart` at `now` and
    /// stamps `warning1SentAt`/`warning2SentAt` when entering the matching
    /// Sent state. Entering a pending warning from a non-warning status
    /// remembers that status; moving to a non-warning status forgets it.
    pub fn update_status(
        &mut self,
        id: &RecordId,
        status: Status,
        now: DateTime<Utc>,
    ) -> Result<&Ticket, TicketwatchError> {
        let ticket = self.ticket_mut(id)?;

        if status.pending_warning_level().is_some() && !ticket.status.is_warning() {
            ticket.pre_warning_status = Some(ticket.status.clone());
        } else if !status.is_warning() {
            ticket.pre_warning_status = None;
        }

        match status {
            Status::Warning1Sent => ticket.warning1_sent_at = Some(now),
            Status::Warning2Sent => ticket.warning2_sent_at = Some(now),
            _ => {}
        }

        ticket.status = status;
        ticket.last_modified = Some(now);
        ticket.warning_tracking_start = Some(now);
        Ok(ticket)
    }

    /// Apply field edits.
    ///
    /// A new `lastModified` also becomes the tracking start and, for a ticket
    /// sitting in `Warning 1 Sent` / `Warning 2 Sent`, the matching sent
    /// stamp. The edited ticket is then evaluated at `now` and the result
    /// stored together with the edit.
    pub fn edit_ticket(
        &mut self,
        id: &RecordId,
        edit: TicketEdit,
        now: &DateTime<FixedOffset>,
        runner: &EscalationRunner,
        ids: &mut dyn NotificationIds,
    ) -> Result<EditOutcome, TicketwatchError> {
        if let Some(title) = &edit.title {
            if title.trim().is_empty() {
                return Err(TicketwatchError::InvalidInput(
                    "Title cannot be blank".to_string(),
                ));
            }
            validate_length("title", title.trim(), MAX_TITLE_LENGTH)?;
        }
        if let Some(label) = &edit.label {
            validate_length("label", label.trim(), MAX_TITLE_LENGTH)?;
        }
        if let Some(note) = &edit.note {
            validate_length("note", note, MAX_NOTE_LENGTH)?;
        }

        let ticket = self.ticket_mut(id)?;
        let mut edited = ticket.clone();

        if let Some(title) = edit.title {
            edited.title = title.trim().to_string();
        }
        if let Some(label) = edit.label {
            edited.label = label.trim().to_string();
        }
        if let Some(severity) = edit.severity {
            edited.severity = severity;
        }
        if let Some(note) = edit.note {
            edited.note = Some(note).filter(|n| !n.trim().is_empty());
        }
        if let Some(flag) = edit.has_draft_email {
            edited.has_draft_email = flag;
        }

        let re_evaluated = edit.last_modified.is_some();
        let mut notifications = Vec::new();

        if let Some(last_modified) = edit.last_modified {
            edited.last_modified = Some(last_modified);
            edited.warning_tracking_start = Some(last_modified);
            match edited.status {
                Status::Warning1Sent => edited.warning1_sent_at = Some(last_modified),
                Status::Warning2Sent => edited.warning2_sent_at = Some(last_modified),
                _ => {}
            }

            let mut outcome = runner.run_batch(std::slice::from_ref(&edited), now, ids);
            if let Some(evaluated) = outcome.updated_tickets.pop() {
                edited = evaluated;
            }
            notifications = outcome.new_notifications;
        }

        *ticket = edited.clone();
        self.prepend_notifications(notifications.clone());

        Ok(EditOutcome {
            ticket: edited,
            re_evaluated,
            notifications,
        })
    }

    // -------------------------------------------------------------------------
    // Escalation passes
    // -------------------------------------------------------------------------

    /// Evaluate the given regions at `now`, each collection on its own, and
    /// store the results. New notifications go ahead of existing ones, in
    /// region order then ticket order.
    pub fn run_escalation(
        &mut self,
        regions: &[Region],
        now: &DateTime<FixedOffset>,
        runner: &EscalationRunner,
        ids: &mut dyn NotificationIds,
    ) -> RunReport {
        let mut reports = Vec::with_capacity(regions.len());
        let mut raised = Vec::new();

        for &region in regions {
            let tickets = self.tickets_mut(region);
            let outcome = runner.run_batch(tickets, now, ids);
            reports.push(RegionReport {
                region,
                evaluated: tickets.len(),
                changed: outcome.changed,
                skipped: outcome.skipped,
            });
            *tickets = outcome.updated_tickets;
            raised.extend(outcome.new_notifications);
        }

        self.prepend_notifications(raised.clone());

        RunReport {
            regions: reports,
            notifications: raised,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Tickets of one or both regions, optionally filtered by status, sorted
    /// by status display order (stable within a status).
    #[must_use]
    pub fn list(&self, region: Option<Region>, status: Option<&Status>) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = match region {
            Some(region) => self.tickets(region).iter().collect(),
            None => self.eu.iter().chain(&self.global).collect(),
        };
        if let Some(status) = status {
            tickets.retain(|t| &t.status == status);
        }
        tickets.sort_by_key(|t| t.status.display_rank());
        tickets
    }

    /// Case-insensitive substring search over number, title and label, EU
    /// first. A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Ticket> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.eu
            .iter()
            .chain(&self.global)
            .filter(|t| {
                t.ticket_number.to_lowercase().contains(&q)
                    || t.title.to_lowercase().contains(&q)
                    || t.label.to_lowercase().contains(&q)
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// All notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Mark every notification read. Returns how many flipped.
    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for n in self.notifications.iter_mut().filter(|n| !n.read) {
            n.read = true;
            flipped += 1;
        }
        flipped
    }

    /// Remove one notification.
    pub fn dismiss_notification(
        &mut self,
        id: &RecordId,
    ) -> Result<Notification, TicketwatchError> {
        let pos = self
            .notifications
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| TicketwatchError::NotificationNotFound(id.clone()))?;
        Ok(self.notifications.remove(pos))
    }

    /// Remove all notifications. Returns how many were removed.
    pub fn clear_notifications(&mut self) -> usize {
        let removed = self.notifications.len();
        self.notifications.clear();
        removed
    }

    fn prepend_notifications(&mut self, mut fresh: Vec<Notification>) {
        if fresh.is_empty() {
            return;
        }
        fresh.append(&mut self.notifications);
        self.notifications = fresh;
    }
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), TicketwatchError> {
    if value.len() > max {
        return Err(TicketwatchError::InvalidInput(format!(
            "{} is {} bytes, maximum is {}",
            field,
            value.len(),
            max
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0)
            .single()
            .expect("valid date")
    }

    fn book_with(region: Region, number: &str, day: u32) -> (TicketBook, RecordId) {
        let mut book = TicketBook::new();
        let id = RecordId::new(format!("id-{number}"));
        book.add_ticket(NewTicket::new(region, number, "Title"), id.clone(), at(day, 9))
            .expect("add");
        (book, id)
    }

    #[test]
    fn add_rejects_blank_number_or_title() {
        let mut book = TicketBook::new();
        let result = book.add_ticket(
            NewTicket::new(Region::Eu, "  ", "Title"),
            RecordId::new("x"),
            at(2, 9),
        );
        assert!(matches!(result, Err(TicketwatchError::InvalidInput(_))));

        let result = book.add_ticket(
            NewTicket::new(Region::Eu, "100", ""),
            RecordId::new("x"),
            at(2, 9),
        );
        assert!(matches!(result, Err(TicketwatchError::InvalidInput(_))));
        assert_eq!(book.ticket_count(), 0);
    }

    #[test]
    fn add_stamps_all_anchors() {
        let (book, id) = book_with(Region::Global, "100", 2);
        let ticket = book.ticket(&id).expect("ticket");
        assert_eq!(ticket.created_at, Some(at(2, 9)));
        assert_eq!(ticket.last_modified, Some(at(2, 9)));
        assert_eq!(ticket.warning_tracking_start, Some(at(2, 9)));
        assert_eq!(book.tickets(Region::Global).len(), 1);
        assert!(book.tickets(Region::Eu).is_empty());
    }

    #[test]
    fn add_returns_the_stored_ticket() {
        let mut book = TicketBook::new();
        let added = book
            .add_ticket(
                NewTicket::new(Region::Global, " 200 ", " Disk alarm "),
                RecordId::new("g-1"),
                at(2, 9),
            )
            .expect("add")
            .clone();
        assert_eq!(added.id, RecordId::new("g-1"));
        assert_eq!(added.ticket_number, "200");
        assert_eq!(added.title, "Disk alarm");
        assert_eq!(book.tickets(Region::Global), [added]);
    }

    #[test]
    fn label_limit_applies_to_trimmed_label() {
        let padded = format!("  {}  ", "x".repeat(MAX_TITLE_LENGTH));
        let mut book = TicketBook::new();
        let mut draft = NewTicket::new(Region::Eu, "100", "Title");
        draft.label = padded.clone();
        let stored = book
            .add_ticket(draft, RecordId::new("a"), at(2, 9))
            .expect("trimmed label fits")
            .label
            .len();
        assert_eq!(stored, MAX_TITLE_LENGTH);

        let edit = TicketEdit {
            label: Some(padded),
            ..TicketEdit::default()
        };
        book.edit_ticket(
            &RecordId::new("a"),
            edit,
            &at(3, 9).fixed_offset(),
            &EscalationRunner::new(),
            &mut SequentialIds::new("n"),
        )
        .expect("trimmed label fits on edit");

        let mut draft = NewTicket::new(Region::Eu, "101", "Title");
        draft.label = "x".repeat(MAX_TITLE_LENGTH + 1);
        let result = book.add_ticket(draft, RecordId::new("b"), at(2, 9));
        assert!(matches!(result, Err(TicketwatchError::InvalidInput(_))));
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        let result = book.add_ticket(NewTicket::new(Region::Global, "101", "T"), id, at(2, 9));
        assert!(matches!(result, Err(TicketwatchError::InvalidInput(_))));
    }

    #[test]
    fn sent_status_stamps_its_anchor() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        book.update_status(&id, Status::Warning1Sent, at(3, 9))
            .expect("update");
        let ticket = book.ticket(&id).expect("ticket");
        assert_eq!(ticket.warning1_sent_at, Some(at(3, 9)));
        assert_eq!(ticket.warning2_sent_at, None);
        assert_eq!(ticket.last_modified, Some(at(3, 9)));
        assert_eq!(ticket.warning_tracking_start, Some(at(3, 9)));
    }

    #[test]
    fn manual_pending_warning_remembers_previous_status() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        book.update_status(&id, Status::InProgressSupport, at(2, 10))
            .expect("update");
        book.update_status(&id, Status::PendingWarning1, at(2, 11))
            .expect("update");
        assert_eq!(
            book.ticket(&id).and_then(|t| t.pre_warning_status.clone()),
            Some(Status::InProgressSupport)
        );

        book.update_status(&id, Status::InProgressEngineering, at(2, 12))
            .expect("update");
        assert_eq!(book.ticket(&id).and_then(|t| t.pre_warning_status.clone()), None);
    }

    #[test]
    fn delete_unknown_ticket_errors() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        assert!(matches!(
            book.delete_ticket(&RecordId::new("nope")),
            Err(TicketwatchError::TicketNotFound(_))
        ));
        assert_eq!(book.delete_ticket(&id).expect("delete").ticket_number, "100");
        assert_eq!(book.ticket_count(), 0);
    }

    #[test]
    fn edit_without_last_modified_skips_evaluation() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        let edit = TicketEdit {
            note: Some("called customer".to_string()),
            has_draft_email: Some(true),
            ..TicketEdit::default()
        };
        let outcome = book
            .edit_ticket(
                &id,
                edit,
                &at(20, 9).fixed_offset(),
                &EscalationRunner::new(),
                &mut SequentialIds::new("n"),
            )
            .expect("edit");

        assert!(!outcome.re_evaluated);
        assert_eq!(outcome.ticket.status, Status::PendingInitialContact);
        assert_eq!(outcome.ticket.note.as_deref(), Some("called customer"));
        assert!(outcome.ticket.has_draft_email);
        assert!(book.notifications().is_empty());
    }

    #[test]
    fn edit_of_last_modified_syncs_sent_stamp() {
        let (mut book, id) = book_with(Region::Eu, "100", 2);
        book.update_status(&id, Status::Warning2Sent, at(2, 10))
            .expect("update");
        let edit = TicketEdit {
            last_modified: Some(at(3, 9)),
            ..TicketEdit::default()
        };
        let outcome = book
            .edit_ticket(
                &id,
                edit,
                &at(4, 9).fixed_offset(),
                &EscalationRunner::new(),
                &mut SequentialIds::new("n"),
            )
            .expect("edit");

        assert!(outcome.re_evaluated);
        assert_eq!(outcome.ticket.warning2_sent_at, Some(at(3, 9)));
        assert_eq!(outcome.ticket.warning_tracking_start, Some(at(3, 9)));
        assert_eq!(outcome.ticket.status, Status::Warning2Sent);
    }

    #[test]
    fn run_escalation_prepends_in_region_order() {
        let mut book = TicketBook::new();
        book.add_ticket(
            NewTicket::new(Region::Global, "G1", "T"),
            RecordId::new("g1"),
            at(2, 9),
        )
        .expect("add");
        book.add_ticket(NewTicket::new(Region::Eu, "E1", "T"), RecordId::new("e1"), at(2, 9))
            .expect("add");
        book.notifications.push(Notification {
            id: RecordId::new("old"),
            ticket_number: "X".to_string(),
            region: Region::Eu,
            message: "older".to_string(),
            timestamp: Some(at(1, 9)),
            read: true,
        });

        let report = book.run_escalation(
            &Region::ALL,
            &at(4, 10).fixed_offset(),
            &EscalationRunner::new(),
            &mut SequentialIds::new("n"),
        );

        assert_eq!(report.changed_count(), 2);
        let order: Vec<_> = book
            .notifications()
            .iter()
            .map(|n| n.ticket_number.as_str())
            .collect();
        assert_eq!(order, vec!["E1", "G1", "X"]);
        assert_eq!(book.unread_count(), 2);
    }

    #[test]
    fn list_sorts_by_display_order_and_filters() {
        let mut book = TicketBook::new();
        let mut draft = NewTicket::new(Region::Eu, "1", "T");
        draft.status = Status::PendingCustomerResponse;
        book.add_ticket(draft, RecordId::new("a"), at(2, 9)).expect("add");
        let mut draft = NewTicket::new(Region::Global, "2", "T");
        draft.status = Status::PendingWarning2;
        book.add_ticket(draft, RecordId::new("b"), at(2, 9)).expect("add");
        book.add_ticket(NewTicket::new(Region::Eu, "3", "T"), RecordId::new("c"), at(2, 9))
            .expect("add");

        let numbers: Vec<_> = book
            .list(None, None)
            .iter()
            .map(|t| t.ticket_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["3", "2", "1"]);

        assert_eq!(book.list(Some(Region::Eu), None).len(), 2);
        assert_eq!(book.list(None, Some(&Status::PendingWarning2)).len(), 1);
    }

    #[test]
    fn search_matches_number_title_and_label() {
        let mut book = TicketBook::new();
        let mut draft = NewTicket::new(Region::Eu, "TKT-1234", "Printer on fire");
        draft.label = "Hardware".to_string();
        book.add_ticket(draft, RecordId::new("a"), at(2, 9)).expect("add");
        book.add_ticket(
            NewTicket::new(Region::Global, "TKT-9", "VPN drops"),
            RecordId::new("b"),
            at(2, 9),
        )
        .expect("add");

        assert_eq!(book.search("tkt").len(), 2);
        assert_eq!(book.search("FIRE").len(), 1);
        assert_eq!(book.search("hardware").len(), 1);
        assert!(book.search("  ").is_empty());
    }

    #[test]
    fn notification_housekeeping() {
        let (mut book, _) = book_with(Region::Eu, "100", 2);
        book.run_escalation(
            &Region::ALL,
            &at(4, 10).fixed_offset(),
            &EscalationRunner::new(),
            &mut SequentialIds::new("n"),
        );
        assert_eq!(book.unread_count(), 1);
        assert_eq!(book.mark_all_read(), 1);
        assert_eq!(book.mark_all_read(), 0);

        assert!(matches!(
            book.dismiss_notification(&RecordId::new("missing")),
            Err(TicketwatchError::NotificationNotFound(_))
        ));
        book.dismiss_notification(&RecordId::new("n-1"))
            .expect("dismiss");
        assert!(book.notifications().is_empty());
        assert_eq!(book.clear_notifications(), 0);
    }

    #[test]
    fn normalize_regions_fixes_misfiled_tickets() {
        let (mut book, _) = book_with(Region::Eu, "100", 2);
        book.eu[0].region = Region::Global;
        assert_eq!(book.normalize_regions(), 1);
        assert_eq!(book.eu[0].region, Region::Eu);
        assert_eq!(book.normalize_regions(), 0);
    }
}
