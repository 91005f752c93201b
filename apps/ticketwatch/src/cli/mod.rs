//! # Ticketwatch CLI Module
//!
//! This module implements the CLI interface for Ticketwatch.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty data file
//! - `add` - Create a ticket
//! - `list` - List tickets by region and status
//! - `search` - Find tickets by number, title or label
//! - `set-status` - Manual status change
//! - `edit` - Edit ticket fields (a `--last-modified` edit re-evaluates)
//! - `delete` - Remove a ticket
//! - `notifications` - Show notifications, optionally marking them read
//! - `dismiss` / `clear` - Remove one / all notifications
//! - `check` - Run one escalation pass
//! - `watch` - Run escalation passes periodically until Ctrl-C
//! - `summary` - Counts per status and upcoming escalations

mod commands;

use crate::clock::{Clock, WallClock};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticketwatch_core::{EscalationRunner, Region, Severity, Status, TicketwatchError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Ticketwatch - support ticket warning escalation
///
/// Tracks tickets per region and escalates quiet ones through the warning
/// ladder after a number of business days without activity.
#[derive(Parser, Debug)]
#[command(name = "ticketwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short = 'c', long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path to the data file (overrides storage.path)
    #[arg(short = 'D', long, global = true)]
    pub data: Option<PathBuf>,

    /// Use the local clock instead of the remote time service
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty data file
    Init {
        /// Overwrite an existing data file
        #[arg(short, long)]
        force: bool,
    },

    /// Create a ticket
    Add {
        /// Region (EU or Global)
        #[arg(short, long)]
        region: Region,

        /// Ticket number as shown in the ticketing system
        #[arg(short, long)]
        number: String,

        /// Ticket title
        #[arg(short, long)]
        title: String,

        /// Free-form label
        #[arg(short, long, default_value = "")]
        label: String,

        /// Severity (Critical, High, Medium, Low)
        #[arg(short, long, default_value = "Medium")]
        severity: Severity,

        /// Initial status
        #[arg(long, value_parser = parse_status, default_value = "Pending Initial Contact")]
        status: Status,

        /// Last activity (RFC 3339 or YYYY-MM-DDTHH:MM in the clock's offset)
        #[arg(long)]
        last_modified: Option<String>,
    },

    /// List tickets
    List {
        /// Only this region
        #[arg(short, long)]
        region: Option<Region>,

        /// Only this status
        #[arg(short, long, value_parser = parse_status)]
        status: Option<Status>,
    },

    /// Search tickets by number, title or label
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Change a ticket's status
    SetStatus {
        /// Ticket id
        id: String,

        /// New status
        #[arg(value_parser = parse_status)]
        status: Status,
    },

    /// Edit ticket fields
    Edit {
        /// Ticket id
        id: String,

        /// Last activity (RFC 3339 or YYYY-MM-DDTHH:MM in the clock's offset)
        #[arg(long)]
        last_modified: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        severity: Option<Severity>,

        /// Note text; an empty string removes the note
        #[arg(long)]
        note: Option<String>,

        /// Whether a draft email exists
        #[arg(long)]
        draft_email: Option<bool>,
    },

    /// Delete a ticket
    Delete {
        /// Ticket id
        id: String,
    },

    /// Show notifications
    Notifications {
        /// Mark all notifications as read
        #[arg(short, long)]
        mark_read: bool,
    },

    /// Remove one notification
    Dismiss {
        /// Notification id
        id: String,
    },

    /// Remove all notifications
    Clear,

    /// Run one escalation pass and save
    Check,

    /// Run escalation passes periodically until Ctrl-C
    Watch {
        /// Seconds between passes (overrides scheduler.interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show counts per status and upcoming escalations
    Summary,
}

/// Status names are matched ignoring case and separators; unknown names are
/// rejected rather than stored as custom statuses.
fn parse_status(s: &str) -> Result<Status, String> {
    s.parse::<Status>().map_err(|e| e.to_string())
}

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub data_path: PathBuf,
    pub clock: Clock,
    pub runner: EscalationRunner,
    pub wall_clock: WallClock,
    pub json_mode: bool,
}

impl Context {
    /// Resolve config file, flag overrides and time source.
    pub fn from_cli(cli: &Cli) -> Result<Self, TicketwatchError> {
        let config = Config::load(&cli.config)?;
        let data_path = cli
            .data
            .clone()
            .unwrap_or_else(|| config.storage.path.clone());
        let clock = Clock::from_config(&config.clock, cli.offline);
        let runner = config.runner()?;
        let wall_clock = WallClock::for_runner(&runner);

        Ok(Self {
            config,
            data_path,
            clock,
            runner,
            wall_clock,
            json_mode: cli.json_mode,
        })
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), TicketwatchError> {
    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::Add {
            region,
            number,
            title,
            label,
            severity,
            status,
            last_modified,
        }) => {
            let draft = TicketDraft {
                region,
                number,
                title,
                label,
                severity,
                status,
                last_modified,
            };
            cmd_add(&ctx, draft).await
        }
        Some(Commands::List { region, status }) => cmd_list(&ctx, region, status.as_ref()),
        Some(Commands::Search { query }) => cmd_search(&ctx, &query),
        Some(Commands::SetStatus { id, status }) => cmd_set_status(&ctx, &id, status).await,
        Some(Commands::Edit {
            id,
            last_modified,
            title,
            label,
            severity,
            note,
            draft_email,
        }) => {
            let fields = EditFields {
                last_modified,
                title,
                label,
                severity,
                note,
                draft_email,
            };
            cmd_edit(&ctx, &id, fields).await
        }
        Some(Commands::Delete { id }) => cmd_delete(&ctx, &id),
        Some(Commands::Notifications { mark_read }) => cmd_notifications(&ctx, mark_read),
        Some(Commands::Dismiss { id }) => cmd_dismiss(&ctx, &id),
        Some(Commands::Clear) => cmd_clear(&ctx),
        Some(Commands::Check) => cmd_check(&ctx).await,
        Some(Commands::Watch { interval }) => cmd_watch(&ctx, interval).await,
        Some(Commands::Summary) => cmd_summary(&ctx).await,
        None => {
            // No subcommand - list everything by default
            cmd_list(&ctx, None, None)
        }
    }
}
