//! # Time Sources
//!
//! Where the authoritative "now" comes from.
//!
//! The remote source asks a world-time service for Europe/Bucharest local
//! time, so the offset it reports also decides which weekday the business
//! calendar sees. Any failure (connect, timeout, HTTP status, body) is logged
//! and answered with the local clock; callers never see an error.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use ticketwatch_core::{
    EscalationRunner, TicketBook, TicketwatchError, book_from_json, parse_timestamp,
};

use crate::config::ClockConfig;

/// Supplier of the current instant.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> impl Future<Output = DateTime<FixedOffset>> + Send;
}

/// Local system time in the local offset.
pub fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

// =============================================================================
// ERRORS
// =============================================================================

/// Why a remote time fetch failed.
#[derive(Debug)]
pub enum ClockError {
    /// The HTTP client could not be built.
    ClientBuild(String),
    /// Cannot reach the service, or the request timed out.
    ConnectionFailed(String),
    /// The service answered with a non-success status.
    BadStatus(u16),
    /// The body was not the expected JSON, or `datetime` did not parse.
    ParseError(String),
}

impl std::fmt::Display for ClockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientBuild(msg) => write!(f, "Cannot build HTTP client: {msg}"),
            Self::ConnectionFailed(msg) => write!(f, "Cannot reach time service: {msg}"),
            Self::BadStatus(status) => write!(f, "Time service returned status {status}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClockError {}

// =============================================================================
// REMOTE SOURCE
// =============================================================================

#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    datetime: String,
}

/// Remote clock backed by a worldtimeapi-compatible endpoint.
#[derive(Debug, Clone)]
pub struct WorldTimeSource {
    http: reqwest::Client,
    url: String,
}

impl WorldTimeSource {
    /// Create a source for `url` with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClockError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClockError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the remote time, surfacing failures.
    pub async fn fetch(&self) -> Result<DateTime<FixedOffset>, ClockError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ClockError::ConnectionFailed(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClockError::BadStatus(status.as_u16()));
        }

        let body = resp
            .json::<WorldTimeResponse>()
            .await
            .map_err(|e| ClockError::ParseError(e.to_string()))?;

        parse_remote_datetime(&body.datetime)
    }
}

impl TimeSource for WorldTimeSource {
    async fn now(&self) -> DateTime<FixedOffset> {
        match self.fetch().await {
            Ok(now) => {
                tracing::debug!("Remote time: {}", now);
                now
            }
            Err(e) => {
                tracing::warn!("Falling back to local clock: {}", e);
                local_now()
            }
        }
    }
}

/// Parse the `datetime` field, keeping the reported offset.
pub fn parse_remote_datetime(raw: &str) -> Result<DateTime<FixedOffset>, ClockError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| ClockError::ParseError(format!("datetime '{}': {}", raw, e)))
}

// =============================================================================
// LOCAL SOURCE
// =============================================================================

/// The machine's own clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeSource;

impl TimeSource for LocalTimeSource {
    async fn now(&self) -> DateTime<FixedOffset> {
        local_now()
    }
}

// =============================================================================
// WALL CLOCK
// =============================================================================

/// Zone that timestamps written without an offset are read in, both in the
/// data file and on the command line.
///
/// The front end stores datetime-local values as typed, in the machine's
/// time zone, so that is the default. A pinned calendar offset overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallClock {
    Pinned(FixedOffset),
    Local,
}

impl WallClock {
    /// Pinned to the runner's calendar offset when it has one.
    pub fn for_runner(runner: &EscalationRunner) -> Self {
        runner.offset().map_or(Self::Local, Self::Pinned)
    }

    /// Parse a timestamp, reading zone-less input as wall-clock time.
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::Pinned(offset) => parse_timestamp(raw, offset),
            Self::Local => parse_timestamp(raw, &Local),
        }
    }

    /// Parse a data file, reading zone-less timestamps as wall-clock time.
    pub fn read_book(&self, bytes: &[u8]) -> Result<TicketBook, TicketwatchError> {
        match self {
            Self::Pinned(offset) => book_from_json(bytes, offset),
            Self::Local => book_from_json(bytes, &Local),
        }
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// The time source chosen by configuration.
#[derive(Debug, Clone)]
pub enum Clock {
    Remote(WorldTimeSource),
    Local(LocalTimeSource),
}

impl Clock {
    /// Remote unless disabled in config or by `--offline`.
    pub fn from_config(config: &ClockConfig, offline: bool) -> Self {
        if offline || !config.enabled {
            tracing::debug!("Using local clock");
            return Self::Local(LocalTimeSource);
        }
        match WorldTimeSource::new(config.url.clone(), config.timeout()) {
            Ok(source) => Self::Remote(source),
            Err(e) => {
                tracing::warn!("{}; using local clock", e);
                Self::Local(LocalTimeSource)
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl TimeSource for Clock {
    async fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Self::Remote(source) => source.now().await,
            Self::Local(source) => source.now().await,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
