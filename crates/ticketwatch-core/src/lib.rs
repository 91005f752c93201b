//! # ticketwatch-core
//!
//! The deterministic escalation engine for Ticketwatch - THE LOGIC.
//!
//! This crate decides when a support ticket that has gone quiet escalates
//! through the warning ladder, and holds the ticket book the operator edits.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Never reads the clock: "now" is always an argument
//! - Never invents ids: a [`NotificationIds`] source is injected
//! - Never touches files: persistence is a bytes-in, bytes-out transformation
//! - Has NO async, NO network dependencies (pure Rust)
//!
//! The same book and the same "now" always produce the same result.

// =============================================================================
// MODULES
// =============================================================================

pub mod book;
pub mod calendar;
pub mod formats;
pub mod ids;
pub mod policy;
pub mod primitives;
pub mod runner;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::timestamp::{format_timestamp, parse_timestamp};
pub use types::{Notification, RecordId, Region, Severity, Status, Ticket, TicketwatchError};

// =============================================================================
// RE-EXPORTS: Escalation Engine
// =============================================================================

pub use book::{EditOutcome, NewTicket, RegionReport, RunReport, TicketBook, TicketEdit};
pub use calendar::BusinessCalendar;
pub use ids::{NotificationIds, SequentialIds};
pub use policy::{EscalationPolicy, Evaluation, Transition, escalation_message};
pub use runner::{BatchOutcome, EscalationRunner, run_batch};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{MAX_DATA_FILE_SIZE, book_from_json, book_to_json};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{BookSummary, RegionSummary, StatusCount, UpcomingEscalation};
