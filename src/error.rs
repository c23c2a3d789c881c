use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history database not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),
    #[error("cannot read history database {}: {reason}", path.display())]
    DatabaseAccess { path: PathBuf, reason: String },
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("no visit records to summarise")]
    EmptyResultSet,
    #[error("unsupported input format (expected .csv): {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("home directory unavailable, pass the history database path explicitly")]
    HomeDirUnavailable,
    #[error("chart rendering failed for {}: {reason}", path.display())]
    Render { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl HistoryError {
    pub(crate) fn access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        HistoryError::DatabaseAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
