//! # Data File Store
//!
//! Reads and writes the ticket book on disk. The byte format lives in
//! `ticketwatch_core::formats`; this module only moves bytes.
//!
//! Writes go to a hidden sibling file first and are renamed into place, so a
//! crash mid-write never leaves a truncated data file behind.

use crate::clock::WallClock;
use std::path::{Path, PathBuf};
use ticketwatch_core::{MAX_DATA_FILE_SIZE, TicketBook, TicketwatchError, book_to_json};

/// Load the book at `path`. A missing file is an empty book.
///
/// Zone-less timestamps in the file are read as `wall` clock time.
pub fn load_book(path: &Path, wall: &WallClock) -> Result<TicketBook, TicketwatchError> {
    if !path.exists() {
        tracing::debug!("No data file at {:?}, starting empty", path);
        return Ok(TicketBook::new());
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| TicketwatchError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_DATA_FILE_SIZE as u64 {
        return Err(TicketwatchError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_DATA_FILE_SIZE
        )));
    }

    let data = std::fs::read(path)
        .map_err(|e| TicketwatchError::IoError(format!("Read data file: {}", e)))?;
    wall.read_book(&data)
}

/// Write the book to `path` atomically.
pub fn save_book(book: &TicketBook, path: &Path) -> Result<(), TicketwatchError> {
    let data = book_to_json(book)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| TicketwatchError::IoError(format!("Create data directory: {}", e)))?;
    }

    let tmp = temp_path(path)?;
    std::fs::write(&tmp, &data)
        .map_err(|e| TicketwatchError::IoError(format!("Write data file: {}", e)))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        TicketwatchError::IoError(format!("Replace data file: {}", e))
    })?;

    tracing::debug!("Saved {} tickets to {:?}", book.ticket_count(), path);
    Ok(())
}

/// `dir/.name.tmp` next to `path`.
fn temp_path(path: &Path) -> Result<PathBuf, TicketwatchError> {
    let name = path
        .file_name()
        .ok_or_else(|| TicketwatchError::IoError("Data path has no filename".to_string()))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
