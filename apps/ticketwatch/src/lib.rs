//! # Ticketwatch
//!
//! Application layer around `ticketwatch-core`: where "now" comes from, where
//! the data file lives, and when escalation passes run.

pub mod cli;
pub mod clock;
pub mod config;
pub mod ids;
pub mod scheduler;
pub mod store;
