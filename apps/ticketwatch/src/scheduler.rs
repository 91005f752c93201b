//! # Escalation Scheduler
//!
//! Drives escalation passes over the data file: one startup pass, then one
//! pass per interval until shutdown.
//!
//! Each pass fetches "now", reloads the data file (so edits made by other
//! CLI invocations are picked up), evaluates every region and saves. Passes
//! run inline in the loop, so they never overlap.

use crate::clock::{TimeSource, WallClock};
use crate::ids::UuidIds;
use crate::store::{load_book, save_book};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ticketwatch_core::{EscalationRunner, Region, RunReport, TicketwatchError};
use tokio::time::MissedTickBehavior;

/// Which trigger started a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Startup,
    Periodic,
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Startup => f.write_str("startup"),
            Self::Periodic => f.write_str("periodic"),
        }
    }
}

/// Periodic escalation driver for one data file.
#[derive(Debug)]
pub struct Watcher<T: TimeSource> {
    clock: T,
    runner: EscalationRunner,
    data_path: PathBuf,
    interval: Duration,
}

impl<T: TimeSource> Watcher<T> {
    pub fn new(
        clock: T,
        runner: EscalationRunner,
        data_path: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            clock,
            runner,
            data_path: data_path.into(),
            interval,
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Run one pass: fetch now, reload, evaluate all regions, save.
    pub async fn run_pass(&self, pass: Pass) -> Result<RunReport, TicketwatchError> {
        let now = self.clock.now().await;
        let wall = WallClock::for_runner(&self.runner);
        let mut book = load_book(&self.data_path, &wall)?;

        let report = book.run_escalation(&Region::ALL, &now, &self.runner, &mut UuidIds);
        log_report(pass, &report);

        save_book(&book, &self.data_path)?;
        Ok(report)
    }

    /// Startup pass, then periodic passes until `shutdown` resolves.
    ///
    /// A failing startup pass is returned; failing periodic passes are logged
    /// and the loop carries on.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), TicketwatchError>
    where
        F: Future<Output = ()>,
    {
        self.run_pass(Pass::Startup).await?;

        tracing::info!(
            "Watching {:?}, checking every {}s",
            self.data_path,
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the startup pass covered it.
        ticker.tick().await;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping watcher");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_pass(Pass::Periodic).await {
                        tracing::error!("Periodic pass failed: {}", e);
                    }
                }
            }
        }

        Ok(())
    }
}

fn log_report(pass: Pass, report: &RunReport) {
    for region in &report.regions {
        tracing::debug!(
            "{} pass: {} evaluated {}, changed {}, skipped {}",
            pass,
            region.region,
            region.evaluated,
            region.changed.len(),
            region.skipped.len()
        );
        if !region.skipped.is_empty() {
            tracing::warn!(
                "{} ticket(s) in {} have no usable timestamp and were skipped",
                region.skipped.len(),
                region.region
            );
        }
    }
    for notification in &report.notifications {
        tracing::info!("[{}] {}", notification.region, notification.message);
    }
    if report.changed_count() > 0 {
        tracing::info!(
            "{} pass changed {} ticket(s)",
            pass,
            report.changed_count()
        );
    }
}
