//! # Escalation Scenarios
//!
//! End-to-end behaviour of the warning ladder through the public API.
//!
//! All dates are in March 2026; the 2nd is a Monday.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use ticketwatch_core::{
    EscalationPolicy, EscalationRunner, NewTicket, RecordId, Region, SequentialIds, Severity,
    Status, Ticket, TicketBook, TicketEdit, Transition, run_batch,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0)
        .single()
        .expect("valid date")
}

fn now(day: u32, hour: u32) -> DateTime<FixedOffset> {
    at(day, hour).fixed_offset()
}

fn ticket(status: Status, last_modified: DateTime<Utc>) -> Ticket {
    Ticket {
        id: RecordId::new("t-1"),
        ticket_number: "1001".to_string(),
        title: "Cannot log in".to_string(),
        label: "Access".to_string(),
        severity: Severity::High,
        region: Region::Eu,
        status,
        created_at: Some(last_modified),
        last_modified: Some(last_modified),
        warning_tracking_start: Some(last_modified),
        warning1_sent_at: None,
        warning2_sent_at: None,
        pre_warning_status: None,
        note: None,
        has_draft_email: false,
    }
}

// =============================================================================
// FIRST HOP
// =============================================================================

mod first_hop {
    use super::*;

    /// Monday 09:00 to Wednesday 10:00 is two business days.
    #[test]
    fn two_quiet_weekdays_raise_pending_warning_1() {
        let tickets = vec![ticket(Status::PendingInitialContact, at(2, 9))];
        let outcome = run_batch(&tickets, &now(4, 10), &mut SequentialIds::new("n"));

        let updated = &outcome.updated_tickets[0];
        assert_eq!(updated.status, Status::PendingWarning1);
        assert_eq!(
            updated.pre_warning_status,
            Some(Status::PendingInitialContact)
        );
        assert_eq!(outcome.new_notifications.len(), 1);
        assert_eq!(
            outcome.new_notifications[0].message,
            "Ticket #1001 escalated to Pending Warning 1"
        );
    }

    /// Monday 09:00 to Tuesday 10:00 is one business day.
    #[test]
    fn one_quiet_weekday_is_not_enough() {
        let tickets = vec![ticket(Status::PendingInitialContact, at(2, 9))];
        let outcome = run_batch(&tickets, &now(3, 10), &mut SequentialIds::new("n"));

        assert!(outcome.is_noop());
        assert_eq!(outcome.updated_tickets, tickets);
    }

    #[test]
    fn every_trackable_status_escalates() {
        for status in [
            Status::PendingInitialContact,
            Status::InProgressSupport,
            Status::InProgressEngineering,
            Status::PendingCustomerResponse,
        ] {
            let tickets = vec![ticket(status.clone(), at(2, 9))];
            let outcome = run_batch(&tickets, &now(4, 10), &mut SequentialIds::new("n"));
            assert_eq!(outcome.updated_tickets[0].status, Status::PendingWarning1);
            assert_eq!(outcome.updated_tickets[0].pre_warning_status, Some(status));
        }
    }

    /// Friday 09:00 to Monday 10:00 only counts Monday.
    #[test]
    fn weekend_does_not_count() {
        let tickets = vec![ticket(Status::InProgressSupport, at(6, 9))];
        let outcome = run_batch(&tickets, &now(9, 10), &mut SequentialIds::new("n"));
        assert!(outcome.is_noop());

        let outcome = run_batch(&tickets, &now(10, 10), &mut SequentialIds::new("n"));
        assert_eq!(outcome.updated_tickets[0].status, Status::PendingWarning1);
    }
}

// =============================================================================
// SENT WARNINGS
// =============================================================================

mod sent_warnings {
    use super::*;

    /// Thursday 09:00 to Monday 09:00: Friday and Monday count.
    #[test]
    fn warning_1_sent_ripens_across_weekend() {
        let mut t = ticket(Status::Warning1Sent, at(5, 9));
        t.warning1_sent_at = Some(at(5, 9));
        t.pre_warning_status = Some(Status::InProgressSupport);

        let outcome = run_batch(&[t], &now(9, 9), &mut SequentialIds::new("n"));

        let updated = &outcome.updated_tickets[0];
        assert_eq!(updated.status, Status::PendingWarning2);
        assert_eq!(updated.pre_warning_status, Some(Status::InProgressSupport));
        assert_eq!(
            outcome.new_notifications[0].message,
            "Ticket #1001 escalated to Pending Warning 2"
        );
    }

    #[test]
    fn sent_anchor_ignores_last_modified() {
        // lastModified is old but the warning was only just sent.
        let mut t = ticket(Status::Warning1Sent, at(2, 9));
        t.warning1_sent_at = Some(at(11, 9));

        let outcome = run_batch(&[t], &now(12, 9), &mut SequentialIds::new("n"));
        assert!(outcome.is_noop());
    }

    /// Warning 3 Sent never moves, however long it sits.
    #[test]
    fn warning_3_sent_is_terminal() {
        let policy = EscalationPolicy::default();
        let t = ticket(Status::Warning3Sent, at(2, 9));

        for days in [0, 1, 5, 30, 365] {
            let eval = policy.evaluate(
                &t,
                at(2, 9) + Duration::days(days),
                &mut SequentialIds::new("n"),
            );
            assert_eq!(eval.transition, Transition::Unchanged);
            assert_eq!(eval.status, Status::Warning3Sent);
            assert!(eval.notifications.is_empty());
        }
    }
}

// =============================================================================
// DE-ESCALATION
// =============================================================================

mod de_escalation {
    use super::*;

    /// Moving the anchor to one business day ago withdraws the warning.
    #[test]
    fn edited_anchor_restores_previous_status() {
        let mut book = TicketBook::new();
        let id = RecordId::new("t-1");
        let mut draft = NewTicket::new(Region::Eu, "1001", "Cannot log in");
        draft.status = Status::InProgressSupport;
        book.add_ticket(draft, id.clone(), at(2, 9))
            .expect("add");

        let runner = EscalationRunner::new();
        let mut ids = SequentialIds::new("n");
        book.run_escalation(&Region::ALL, &now(4, 10), &runner, &mut ids);
        assert_eq!(
            book.ticket(&id).map(|t| t.status.clone()),
            Some(Status::PendingWarning1)
        );
        let before = book.notifications().len();

        let edit = TicketEdit {
            last_modified: Some(at(5, 10) - Duration::days(1)),
            ..TicketEdit::default()
        };
        let outcome = book
            .edit_ticket(&id, edit, &now(5, 10), &runner, &mut ids)
            .expect("edit");

        assert!(outcome.re_evaluated);
        assert_eq!(outcome.ticket.status, Status::InProgressSupport);
        assert_eq!(outcome.ticket.pre_warning_status, None);
        assert!(outcome.notifications.is_empty());
        assert_eq!(book.notifications().len(), before);
        assert_eq!(book.ticket(&id), Some(&outcome.ticket));
    }

    #[test]
    fn edited_anchor_can_escalate_immediately() {
        let mut book = TicketBook::new();
        let id = RecordId::new("t-1");
        book.add_ticket(NewTicket::new(Region::Global, "77", "Slow"), id.clone(), at(9, 9))
            .expect("add");

        let edit = TicketEdit {
            last_modified: Some(at(2, 9)),
            ..TicketEdit::default()
        };
        let outcome = book
            .edit_ticket(
                &id,
                edit,
                &now(9, 9),
                &EscalationRunner::new(),
                &mut SequentialIds::new("n"),
            )
            .expect("edit");

        assert_eq!(outcome.ticket.status, Status::PendingWarning1);
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(book.notifications()[0].ticket_number, "77");
        assert_eq!(book.notifications()[0].region, Region::Global);
    }

    #[test]
    fn pending_warning_2_withdraws_to_default() {
        let t = ticket(Status::PendingWarning2, at(4, 9));
        let outcome = run_batch(&[t], &now(5, 9), &mut SequentialIds::new("n"));

        assert_eq!(
            outcome.updated_tickets[0].status,
            Status::PendingCustomerResponse
        );
        assert!(outcome.new_notifications.is_empty());
    }
}

// =============================================================================
// IDEMPOTENCE AND PASSTHROUGH
// =============================================================================

mod stability {
    use super::*;

    #[test]
    fn repeated_runs_do_not_refire() {
        let mut book = TicketBook::new();
        for (n, region) in [("1", Region::Eu), ("2", Region::Global)] {
            book.add_ticket(
                NewTicket::new(region, n, "Quiet"),
                RecordId::new(format!("t-{n}")),
                at(2, 9),
            )
            .expect("add");
        }

        let runner = EscalationRunner::new();
        let mut ids = SequentialIds::new("n");

        let first = book.run_escalation(&Region::ALL, &now(4, 10), &runner, &mut ids);
        assert_eq!(first.changed_count(), 2);
        let snapshot = book.clone();

        for hour in [10, 11, 17] {
            let again = book.run_escalation(&Region::ALL, &now(4, hour), &runner, &mut ids);
            assert_eq!(again.changed_count(), 0);
            assert!(again.notifications.is_empty());
        }
        assert_eq!(book, snapshot);
    }

    #[test]
    fn regions_are_evaluated_independently() {
        let mut book = TicketBook::new();
        book.add_ticket(NewTicket::new(Region::Eu, "E", "T"), RecordId::new("e"), at(2, 9))
            .expect("add");
        book.add_ticket(NewTicket::new(Region::Global, "G", "T"), RecordId::new("g"), at(2, 9))
            .expect("add");

        let report = book.run_escalation(
            &[Region::Global],
            &now(4, 10),
            &EscalationRunner::new(),
            &mut SequentialIds::new("n"),
        );

        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.changed_count(), 1);
        assert_eq!(book.tickets(Region::Eu)[0].status, Status::PendingInitialContact);
        assert_eq!(book.tickets(Region::Global)[0].status, Status::PendingWarning1);
    }

    #[test]
    fn unknown_status_is_left_alone() {
        let t = ticket(Status::Other("Resolved".to_string()), at(2, 9));
        let outcome = run_batch(
            std::slice::from_ref(&t),
            &now(30, 9),
            &mut SequentialIds::new("n"),
        );
        assert!(outcome.is_noop());
        assert_eq!(outcome.updated_tickets[0], t);
    }

    #[test]
    fn ticket_without_timestamps_is_skipped() {
        let mut t = ticket(Status::InProgressEngineering, at(2, 9));
        t.created_at = None;
        t.last_modified = None;
        t.warning_tracking_start = None;

        let outcome = run_batch(&[t], &now(30, 9), &mut SequentialIds::new("n"));
        assert!(outcome.is_noop());
        assert_eq!(outcome.skipped, vec![RecordId::new("t-1")]);
    }

    #[test]
    fn fallback_anchor_chain() {
        // No lastModified: warningTrackingStart is used.
        let mut t = ticket(Status::InProgressSupport, at(2, 9));
        t.last_modified = None;
        t.warning_tracking_start = Some(at(9, 9));
        let outcome = run_batch(
            std::slice::from_ref(&t),
            &now(10, 9),
            &mut SequentialIds::new("n"),
        );
        assert!(outcome.is_noop());

        // Only createdAt left.
        t.warning_tracking_start = None;
        let outcome = run_batch(&[t], &now(10, 9), &mut SequentialIds::new("n"));
        assert_eq!(outcome.updated_tickets[0].status, Status::PendingWarning1);
    }
}
