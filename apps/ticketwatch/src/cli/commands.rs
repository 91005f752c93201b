//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Commands load the data file, apply one core operation and save. Commands
//! that need "now" ask the configured time source first.

use super::Context;
use crate::clock::{TimeSource, WallClock};
use crate::ids::{UuidIds, new_record_id};
use crate::scheduler::{Pass, Watcher};
use crate::store::{load_book, save_book};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ticketwatch_core::{
    BookSummary, NewTicket, Notification, RecordId, Region, RunReport, Severity, Status, Ticket,
    TicketBook, TicketEdit, TicketwatchError, format_timestamp,
};

// =============================================================================
// ARGUMENT BUNDLES
// =============================================================================

/// Arguments of `add`.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub region: Region,
    pub number: String,
    pub title: String,
    pub label: String,
    pub severity: Severity,
    pub status: Status,
    pub last_modified: Option<String>,
}

/// Arguments of `edit`.
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    pub last_modified: Option<String>,
    pub title: Option<String>,
    pub label: Option<String>,
    pub severity: Option<Severity>,
    pub note: Option<String>,
    pub draft_email: Option<bool>,
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty data file.
pub fn cmd_init(ctx: &Context, force: bool) -> Result<(), TicketwatchError> {
    if ctx.data_path.exists() && !force {
        return Err(TicketwatchError::InvalidInput(
            "Data file already exists. Use --force to overwrite.".to_string(),
        ));
    }

    save_book(&TicketBook::new(), &ctx.data_path)?;
    tracing::info!("Initialized data file at {:?}", ctx.data_path);

    if ctx.json_mode {
        print_json(&serde_json::json!({ "data_file": ctx.data_path.to_string_lossy() }));
    } else {
        println!("Initialized new data file at {:?}", ctx.data_path);
    }
    Ok(())
}

// =============================================================================
// TICKET COMMANDS
// =============================================================================

/// Create a ticket.
pub async fn cmd_add(ctx: &Context, draft: TicketDraft) -> Result<(), TicketwatchError> {
    let now = ctx.clock.now().await;
    let last_modified = draft
        .last_modified
        .as_deref()
        .map(|raw| parse_cli_timestamp(raw, &ctx.wall_clock))
        .transpose()?;

    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let new_ticket = NewTicket {
        ticket_number: draft.number,
        title: draft.title,
        label: draft.label,
        severity: draft.severity,
        region: draft.region,
        status: draft.status,
        last_modified,
    };
    let ticket = book
        .add_ticket(new_ticket, new_record_id(), now.with_timezone(&Utc))?
        .clone();
    save_book(&book, &ctx.data_path)?;

    tracing::info!(
        "Added ticket #{} in {} ({})",
        ticket.ticket_number,
        ticket.region,
        ticket.id
    );

    if ctx.json_mode {
        print_json(&ticket);
    } else {
        println!("Added ticket {}", ticket.id);
        print_ticket_detail(&ticket);
    }
    Ok(())
}

/// List tickets, sorted by status display order.
pub fn cmd_list(
    ctx: &Context,
    region: Option<Region>,
    status: Option<&Status>,
) -> Result<(), TicketwatchError> {
    let book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let tickets = book.list(region, status);

    if ctx.json_mode {
        print_json(&tickets);
        return Ok(());
    }

    let scope = region.map_or_else(|| "all regions".to_string(), |r| r.to_string());
    println!("Tickets ({})", scope);
    println!("====================");
    print_ticket_table(&tickets);
    println!();
    println!("{} ticket(s), {} unread notification(s)", tickets.len(), book.unread_count());
    Ok(())
}

/// Case-insensitive search over number, title and label.
pub fn cmd_search(ctx: &Context, query: &str) -> Result<(), TicketwatchError> {
    let book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let hits = book.search(query);

    if ctx.json_mode {
        print_json(&hits);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No tickets match '{}'", query);
    } else {
        print_ticket_table(&hits);
    }
    Ok(())
}

/// Manual status change.
pub async fn cmd_set_status(
    ctx: &Context,
    id: &str,
    status: Status,
) -> Result<(), TicketwatchError> {
    let now = ctx.clock.now().await;
    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let ticket = book
        .update_status(&RecordId::new(id), status, now.with_timezone(&Utc))?
        .clone();
    save_book(&book, &ctx.data_path)?;

    tracing::info!("Ticket #{} set to {}", ticket.ticket_number, ticket.status);

    if ctx.json_mode {
        print_json(&ticket);
    } else {
        println!("Ticket #{} is now {}", ticket.ticket_number, ticket.status);
    }
    Ok(())
}

/// Edit fields; a `lastModified` edit is re-evaluated immediately.
pub async fn cmd_edit(ctx: &Context, id: &str, fields: EditFields) -> Result<(), TicketwatchError> {
    let now = ctx.clock.now().await;
    let edit = TicketEdit {
        title: fields.title,
        label: fields.label,
        severity: fields.severity,
        note: fields.note,
        has_draft_email: fields.draft_email,
        last_modified: fields
            .last_modified
            .as_deref()
            .map(|raw| parse_cli_timestamp(raw, &ctx.wall_clock))
            .transpose()?,
    };
    if edit.is_empty() {
        return Err(TicketwatchError::InvalidInput(
            "Nothing to edit: pass at least one field".to_string(),
        ));
    }

    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let outcome = book.edit_ticket(&RecordId::new(id), edit, &now, &ctx.runner, &mut UuidIds)?;
    save_book(&book, &ctx.data_path)?;

    for notification in &outcome.notifications {
        tracing::info!("[{}] {}", notification.region, notification.message);
    }

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "ticket": outcome.ticket,
            "re_evaluated": outcome.re_evaluated,
            "notifications": outcome.notifications,
        }));
    } else {
        println!("Updated ticket {}", outcome.ticket.id);
        print_ticket_detail(&outcome.ticket);
    }
    Ok(())
}

/// Remove a ticket.
pub fn cmd_delete(ctx: &Context, id: &str) -> Result<(), TicketwatchError> {
    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let removed = book.delete_ticket(&RecordId::new(id))?;
    save_book(&book, &ctx.data_path)?;

    tracing::info!("Deleted ticket #{} ({})", removed.ticket_number, removed.id);

    if ctx.json_mode {
        print_json(&removed);
    } else {
        println!("Deleted ticket #{}", removed.ticket_number);
    }
    Ok(())
}

// =============================================================================
// NOTIFICATION COMMANDS
// =============================================================================

/// Show notifications with the unread count; optionally mark all read.
pub fn cmd_notifications(ctx: &Context, mark_read: bool) -> Result<(), TicketwatchError> {
    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let unread = book.unread_count();
    let shown: Vec<Notification> = book.notifications().to_vec();

    if mark_read && unread > 0 {
        book.mark_all_read();
        save_book(&book, &ctx.data_path)?;
    }

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "unread": unread,
            "notifications": shown,
        }));
        return Ok(());
    }

    println!("Notifications ({} unread)", unread);
    println!("========================");
    for n in &shown {
        println!(
            "{} {}  {:<6}  {}  [{}]",
            if n.read { " " } else { "*" },
            n.timestamp
                .as_ref()
                .map_or_else(|| "-".to_string(), format_timestamp),
            n.region,
            n.message,
            n.id
        );
    }
    Ok(())
}

/// Remove one notification.
pub fn cmd_dismiss(ctx: &Context, id: &str) -> Result<(), TicketwatchError> {
    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let removed = book.dismiss_notification(&RecordId::new(id))?;
    save_book(&book, &ctx.data_path)?;

    if ctx.json_mode {
        print_json(&removed);
    } else {
        println!("Dismissed: {}", removed.message);
    }
    Ok(())
}

/// Remove all notifications.
pub fn cmd_clear(ctx: &Context) -> Result<(), TicketwatchError> {
    let mut book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let removed = book.clear_notifications();
    save_book(&book, &ctx.data_path)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({ "removed": removed }));
    } else {
        println!("Cleared {} notification(s)", removed);
    }
    Ok(())
}

// =============================================================================
// ESCALATION COMMANDS
// =============================================================================

/// One escalation pass over both regions.
pub async fn cmd_check(ctx: &Context) -> Result<(), TicketwatchError> {
    let watcher = Watcher::new(
        ctx.clock.clone(),
        ctx.runner,
        ctx.data_path.clone(),
        ctx.config.interval(),
    );
    let report = watcher.run_pass(Pass::Startup).await?;

    if ctx.json_mode {
        print_json(&report_json(&report));
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Startup pass, then periodic passes until Ctrl-C.
pub async fn cmd_watch(ctx: &Context, interval: Option<u64>) -> Result<(), TicketwatchError> {
    let interval = match interval {
        Some(0) => {
            return Err(TicketwatchError::InvalidInput(
                "--interval must be at least 1 second".to_string(),
            ));
        }
        Some(secs) => std::time::Duration::from_secs(secs),
        None => ctx.config.interval(),
    };

    let watcher = Watcher::new(ctx.clock.clone(), ctx.runner, ctx.data_path.clone(), interval);

    if !ctx.json_mode {
        println!("Watching {:?}", ctx.data_path);
        println!(
            "  Clock:    {}",
            if ctx.clock.is_remote() { ctx.config.clock.url.as_str() } else { "local" }
        );
        println!("  Interval: {}s", interval.as_secs());
        println!();
        println!("Press Ctrl+C to stop");
    }

    watcher
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}

/// Counts per status and upcoming escalations.
pub async fn cmd_summary(ctx: &Context) -> Result<(), TicketwatchError> {
    let now = ctx.clock.now().await;
    let book = load_book(&ctx.data_path, &ctx.wall_clock)?;
    let policy = ctx.runner.policy_at(&now);
    let summary = BookSummary::assess(&book, &policy, now.with_timezone(&Utc));

    if ctx.json_mode {
        print_json(&summary);
        return Ok(());
    }

    println!("Ticketwatch Summary");
    println!("===================");
    println!("As of: {}", now.to_rfc3339());
    println!();
    for region in &summary.regions {
        println!(
            "{}: {} ticket(s), {} pending warning(s), {} sent warning(s)",
            region.region, region.total, region.pending_warnings, region.sent_warnings
        );
        for entry in &region.by_status {
            println!("  {:<26} {}", entry.status, entry.count);
        }
        if region.unanchored > 0 {
            println!("  ({} without a usable timestamp)", region.unanchored);
        }
    }
    println!();
    println!(
        "Notifications: {} unread of {}",
        summary.unread_notifications, summary.total_notifications
    );

    if !summary.upcoming.is_empty() {
        println!();
        println!("Upcoming escalations:");
        for u in &summary.upcoming {
            println!(
                "  {} #{:<12} {:<6} -> {:<18} {}",
                if u.overdue { "!" } else { " " },
                u.ticket_number,
                u.region,
                u.target,
                u.due.with_timezone(now.offset()).to_rfc3339()
            );
        }
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Parse operator-supplied time; zone-less input is read as `wall` clock time.
pub fn parse_cli_timestamp(
    raw: &str,
    wall: &WallClock,
) -> Result<DateTime<Utc>, TicketwatchError> {
    wall.parse(raw).ok_or_else(|| {
        TicketwatchError::InvalidInput(format!(
            "Unrecognised timestamp '{}' (expected RFC 3339 or YYYY-MM-DDTHH:MM)",
            raw
        ))
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn timestamp_or_dash(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(|| "-".to_string(), format_timestamp)
}

fn print_ticket_table(tickets: &[&Ticket]) {
    for t in tickets {
        println!(
            "{:<36}  {:<6}  #{:<12} {:<26} {:<8} {}  (last activity {})",
            t.id,
            t.region,
            t.ticket_number,
            t.status,
            t.severity,
            t.title,
            timestamp_or_dash(t.activity_anchor().as_ref())
        );
    }
}

fn print_ticket_detail(t: &Ticket) {
    println!("  Number:        #{}", t.ticket_number);
    println!("  Title:         {}", t.title);
    if !t.label.is_empty() {
        println!("  Label:         {}", t.label);
    }
    println!("  Region:        {}", t.region);
    println!("  Severity:      {}", t.severity);
    println!("  Status:        {}", t.status);
    if let Some(pre) = &t.pre_warning_status {
        println!("  Before warning: {}", pre);
    }
    println!("  Created:       {}", timestamp_or_dash(t.created_at.as_ref()));
    println!("  Last modified: {}", timestamp_or_dash(t.last_modified.as_ref()));
    if let Some(ts) = &t.warning1_sent_at {
        println!("  Warning 1 sent: {}", format_timestamp(ts));
    }
    if let Some(ts) = &t.warning2_sent_at {
        println!("  Warning 2 sent: {}", format_timestamp(ts));
    }
    if let Some(note) = &t.note {
        println!("  Note:          {}", note);
    }
    if t.has_draft_email {
        println!("  Draft email:   yes");
    }
}

fn report_json(report: &RunReport) -> serde_json::Value {
    let regions: Vec<_> = report
        .regions
        .iter()
        .map(|r| {
            serde_json::json!({
                "region": r.region,
                "evaluated": r.evaluated,
                "changed": r.changed,
                "skipped": r.skipped,
            })
        })
        .collect();
    serde_json::json!({
        "regions": regions,
        "notifications": report.notifications,
    })
}

fn print_report(report: &RunReport) {
    println!("Escalation pass complete");
    for r in &report.regions {
        println!(
            "  {:<6} evaluated {:>4}, changed {:>3}, skipped {:>3}",
            r.region,
            r.evaluated,
            r.changed.len(),
            r.skipped.len()
        );
    }
    if !report.notifications.is_empty() {
        println!();
        for n in &report.notifications {
            println!("  {}", n.message);
        }
    }
}
