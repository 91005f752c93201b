//! # System Module
//!
//! Read-only reporting over a [`crate::TicketBook`].

mod summary;

pub use summary::*;
