//! # Utility Module
//!
//! Output directory handling and file naming shared by both binaries.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::HistoryError;

/// Ensure `path` exists and is a directory, creating it if needed.
pub fn ensure_output_dir(path: &Path) -> Result<(), HistoryError> {
    if path.exists() {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_dir() {
            return Err(HistoryError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("output path is not a directory: {}", path.display()),
            )));
        }
    } else {
        std::fs::create_dir_all(path)?;
        debug!("created output directory {}", path.display());
    }
    Ok(())
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.<extension>`
pub fn timestamped_file_name(prefix: &str, now: NaiveDateTime, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", now.format("%Y%m%d_%H%M%S"))
}
