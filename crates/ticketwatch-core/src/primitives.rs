//! # Escalation Primitives
//!
//! Hardcoded thresholds and limits for the Ticketwatch CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//!
//! ## Warning Ladder
//!
//! | From | To | Business days | Anchor |
//! |------|----|---------------|--------|
//! | trackable status | Pending Warning 1 | 2 | last activity |
//! | Warning 1 Sent | Pending Warning 2 | 2 | `warning1SentAt` |
//! | Warning 2 Sent | Pending Warning 3 | 3 | `warning2SentAt` |
//! | Warning 3 Sent | — | — | terminal |

use crate::Status;

/// Business days of inactivity before a trackable ticket enters
/// `Pending Warning 1`. Also the floor below which a provisional warning is
/// withdrawn.
pub const WARNING_1_THRESHOLD_DAYS: u32 = 2;

/// Business days after `Warning 1 Sent` before `Pending Warning 2`.
pub const WARNING_2_THRESHOLD_DAYS: u32 = 2;

/// Business days after `Warning 2 Sent` before `Pending Warning 3`.
pub const WARNING_3_THRESHOLD_DAYS: u32 = 3;

/// Status restored on de-escalation when no pre-warning status was recorded.
pub const DEFAULT_DE_ESCALATION_STATUS: Status = Status::PendingCustomerResponse;

/// Default period of the escalation re-check, in seconds (5 minutes).
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 5 * 60;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a ticket number.
pub const MAX_TICKET_NUMBER_LENGTH: usize = 64;

/// Maximum length of a ticket title or label.
pub const MAX_TITLE_LENGTH: usize = 512;

/// Maximum length of an operator note.
pub const MAX_NOTE_LENGTH: usize = 8192;
