//! # Formats Module
//!
//! Pure (de)serialization of the data file. File I/O lives in the app layer.

mod persistence;

pub use persistence::*;
