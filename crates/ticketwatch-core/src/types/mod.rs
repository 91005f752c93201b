//! # Core Type Definitions
//!
//! This module contains all core types for the Ticketwatch escalation engine:
//! - Identifiers (`RecordId`)
//! - Ticket classification (`Status`, `Severity`, `Region`)
//! - Records (`Ticket`, `Notification`)
//! - Error types (`TicketwatchError`)
//!
//! ## Persisted Shape
//!
//! Field names serialize in camelCase and statuses as their display names
//! (`"Pending Warning 1"`), which keeps the JSON document readable by the
//! desktop front end that shares it.

pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque identifier for tickets and notifications.
///
/// Older data files stored numeric ids; those load as their decimal text so
/// they keep comparing equal after a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Create a new id from any string-like value.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Ticket status.
///
/// Statuses fall into four policy classes:
/// - trackable (`PendingInitialContact`, `InProgressSupport`,
///   `InProgressEngineering`, `PendingCustomerResponse`)
/// - provisional warnings (`PendingWarning1..3`), set automatically
/// - sent warnings (`Warning1Sent..3Sent`), set by an operator
/// - `Other`: any status string this build does not know, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    PendingInitialContact,
    InProgressSupport,
    PendingWarning3,
    PendingWarning2,
    PendingWarning1,
    Warning3Sent,
    Warning2Sent,
    Warning1Sent,
    InProgressEngineering,
    PendingCustomerResponse,
    Other(String),
}

impl Status {
    /// Every known status, in display order.
    pub const KNOWN: [Status; 10] = [
        Status::PendingInitialContact,
        Status::InProgressSupport,
        Status::PendingWarning3,
        Status::PendingWarning2,
        Status::PendingWarning1,
        Status::Warning3Sent,
        Status::Warning2Sent,
        Status::Warning1Sent,
        Status::InProgressEngineering,
        Status::PendingCustomerResponse,
    ];

    /// Display name, identical to the persisted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Status::PendingInitialContact => "Pending Initial Contact",
            Status::InProgressSupport => "In Progress Support",
            Status::PendingWarning3 => "Pending Warning 3",
            Status::PendingWarning2 => "Pending Warning 2",
            Status::PendingWarning1 => "Pending Warning 1",
            Status::Warning3Sent => "Warning 3 Sent",
            Status::Warning2Sent => "Warning 2 Sent",
            Status::Warning1Sent => "Warning 1 Sent",
            Status::InProgressEngineering => "In Progress Engineering",
            Status::PendingCustomerResponse => "Pending Customer Response",
            Status::Other(s) => s,
        }
    }

    /// Position in the display order. Unknown statuses sort last.
    #[must_use]
    pub fn display_rank(&self) -> usize {
        Self::KNOWN
            .iter()
            .position(|known| known == self)
            .unwrap_or(Self::KNOWN.len())
    }

    /// Statuses eligible for automatic warning-level computation.
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        matches!(
            self,
            Status::PendingInitialContact
                | Status::InProgressSupport
                | Status::InProgressEngineering
                | Status::PendingCustomerResponse
        )
    }

    /// Level of a provisional `Pending Warning N` status.
    #[must_use]
    pub fn pending_warning_level(&self) -> Option<u8> {
        match self {
            Status::PendingWarning1 => Some(1),
            Status::PendingWarning2 => Some(2),
            Status::PendingWarning3 => Some(3),
            _ => None,
        }
    }

    /// Level of an operator-confirmed `Warning N Sent` status.
    #[must_use]
    pub fn sent_level(&self) -> Option<u8> {
        match self {
            Status::Warning1Sent => Some(1),
            Status::Warning2Sent => Some(2),
            Status::Warning3Sent => Some(3),
            _ => None,
        }
    }

    /// True for any pending or sent warning status.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.pending_warning_level().is_some() || self.sent_level().is_some()
    }

    /// The `Pending Warning N` status for a level in `1..=3`.
    #[must_use]
    pub fn pending_warning(level: u8) -> Option<Status> {
        match level {
            1 => Some(Status::PendingWarning1),
            2 => Some(Status::PendingWarning2),
            3 => Some(Status::PendingWarning3),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == s)
            .unwrap_or(Status::Other(s))
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Operator-facing parser: accepts display names in any case, with `-` or `_`
/// in place of spaces (`pending-warning-1`). Rejects unknown statuses.
impl FromStr for Status {
    type Err = TicketwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::KNOWN
            .into_iter()
            .find(|known| normalize_name(known.as_str()) == wanted)
            .ok_or_else(|| TicketwatchError::InvalidInput(format!("Unknown status: '{}'", s)))
    }
}

fn normalize_name(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

// =============================================================================
// SEVERITY & REGION
// =============================================================================

/// Ticket severity. Informational only; the policy does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = TicketwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|sev| sev.as_str().to_lowercase() == wanted)
            .ok_or_else(|| TicketwatchError::InvalidInput(format!("Unknown severity: '{}'", s)))
    }
}

/// Region a ticket is tracked in. Each region is a separate collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "EU")]
    Eu,
    Global,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Eu, Region::Global];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "EU",
            Region::Global => "Global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Region {
    type Err = TicketwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eu" => Ok(Region::Eu),
            "global" => Ok(Region::Global),
            _ => Err(TicketwatchError::InvalidInput(format!(
                "Unknown region: '{}' (expected EU or Global)",
                s
            ))),
        }
    }
}

// =============================================================================
// TICKET
// =============================================================================

/// A support ticket.
///
/// All timestamps are optional at the type level: a damaged record must still
/// load, and the policy skips tickets that have no usable anchor instead of
/// computing against a made-up date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: RecordId,
    pub ticket_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub region: Region,
    pub status: Status,
    #[serde(default, with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Anchor of the first warning threshold.
    #[serde(default, with = "timestamp::lenient")]
    pub warning_tracking_start: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub warning1_sent_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub warning2_sent_at: Option<DateTime<Utc>>,
    /// Status held before the ticket entered a `Pending Warning N` state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_warning_status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub has_draft_email: bool,
}

impl Ticket {
    /// Timestamp the first-hop threshold is measured from:
    /// `lastModified`, then `warningTrackingStart`, then `createdAt`.
    #[must_use]
    pub fn activity_anchor(&self) -> Option<DateTime<Utc>> {
        self.last_modified
            .or(self.warning_tracking_start)
            .or(self.created_at)
    }
}

// =============================================================================
// NOTIFICATION
// =============================================================================

/// A notification raised by an automatic escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub ticket_number: String,
    #[serde(default)]
    pub region: Region,
    pub message: String,
    #[serde(default, with = "timestamp::lenient")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Ticketwatch system.
///
/// The escalation engine itself cannot fail; errors come from operator input,
/// lookups and the persistence boundary.
#[derive(Debug, Error)]
pub enum TicketwatchError {
    /// No ticket with this id exists in either region.
    #[error("Ticket not found: {0}")]
    TicketNotFound(RecordId),

    /// No notification with this id exists.
    #[error("Notification not found: {0}")]
    NotificationNotFound(RecordId),

    /// Operator input was rejected (blank fields, unknown names, bad dates).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
