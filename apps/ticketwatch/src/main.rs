//! # Ticketwatch
//!
//! The main binary for the Ticketwatch warning escalation engine.
//!
//! This application provides:
//! - CLI interface for ticket and notification operations
//! - One-shot and periodic escalation passes
//! - Remote time source with local fallback
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 apps/ticketwatch (THE BINARY)                 │
//! │                                                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │    CLI      │    │  Scheduler  │    │   Time Source    │   │
//! │  │   (clap)    │    │   (tokio)   │    │    (reqwest)     │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │             │
//! │         └──────────────────┼────────────────────┘             │
//! │                            ▼                                  │
//! │                  ┌──────────────────┐                         │
//! │                  │ ticketwatch-core │                         │
//! │                  │   (THE LOGIC)    │                         │
//! │                  └──────────────────┘                         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! ticketwatch init
//! ticketwatch add -r EU -n TKT-1042 -t "VPN drops every hour"
//! ticketwatch set-status <id> "Warning 1 Sent"
//! ticketwatch watch --interval 300
//! ```

use clap::Parser;
use ticketwatch::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing. TICKETWATCH_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr so --json-mode output on stdout stays clean.
    let log_format =
        std::env::var("TICKETWATCH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ticketwatch=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Ticketwatch startup banner.
fn print_banner() {
    println!(
        r#"
  ▀█▀ █ █▀▀ █▄▀ █▀▀ ▀█▀ █ █ █ ▄▀█ ▀█▀ █▀▀ █ █
   █  █ █▄▄ █ █ ██▄  █  ▀▄▀▄▀ █▀█  █  █▄▄ █▀█

  Warning Escalation v{}

  Business days • Per region • Reversible
"#,
        env!("CARGO_PKG_VERSION")
    );
}
