use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::error::HistoryError;
use crate::filter::HistoryFilter;
use crate::metadata::csv::write_records;
use crate::parsers::browser::VisitRecord;
use crate::parsers::sqlite_db;
use crate::util;

/// Standard location of the default Chrome profile's history database.
pub fn default_history_path() -> Result<PathBuf, HistoryError> {
    let home = dirs::home_dir().ok_or(HistoryError::HomeDirUnavailable)?;
    Ok(history_path_for_home(&home))
}

fn history_path_for_home(home: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        home.join("AppData/Local/Google/Chrome/User Data/Default/History")
    } else if cfg!(target_os = "macos") {
        home.join("Library/Application Support/Google/Chrome/Default/History")
    } else {
        home.join(".config/google-chrome/Default/History")
    }
}

/// Private copy of the history database. A running browser keeps the original
/// locked; the copy and its directory are removed when this value drops.
#[derive(Debug)]
pub struct DatabaseSnapshot {
    _dir: TempDir,
    path: PathBuf,
}

impl DatabaseSnapshot {
    pub fn create(source: &Path, scratch_dir: Option<&Path>) -> Result<Self, HistoryError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("chrome-history-");
        let dir = match scratch_dir {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        let path = dir.path().join("History");
        let bytes = std::fs::copy(source, &path)?;
        debug!("copied {} ({bytes} bytes) to {}", source.display(), path.display());
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn database_path(&self) -> Result<PathBuf, HistoryError> {
        match &self.config.database_path {
            Some(path) => Ok(path.clone()),
            None => default_history_path(),
        }
    }

    /// Fetch visits with calendar bounds read in the local time zone.
    pub fn fetch(&self, filter: &HistoryFilter) -> Result<Vec<VisitRecord>, HistoryError> {
        self.fetch_in(filter, &Local)
    }

    pub fn fetch_in<Tz: TimeZone>(
        &self,
        filter: &HistoryFilter,
        tz: &Tz,
    ) -> Result<Vec<VisitRecord>, HistoryError> {
        let source = self.database_path()?;
        if !source.is_file() {
            return Err(HistoryError::DatabaseNotFound(source));
        }

        let snapshot = DatabaseSnapshot::create(&source, self.config.scratch_dir.as_deref())?;
        let range = filter.time_range(tz);
        let records = sqlite_db::extract_visits(snapshot.path(), &range, filter.max_entries())?;
        info!("fetched {} visits from {}", records.len(), source.display());
        Ok(records)
    }

    /// Write `records` to `output`, or to a timestamped file in the configured
    /// output directory. Returns `None` when saving is disabled.
    pub fn save(
        &self,
        records: &[VisitRecord],
        output: Option<&Path>,
    ) -> Result<Option<PathBuf>, HistoryError> {
        if !self.config.save_csv {
            debug!("csv output disabled");
            return Ok(None);
        }

        let path = match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    util::ensure_output_dir(parent)?;
                }
                path.to_path_buf()
            }
            None => {
                util::ensure_output_dir(&self.config.output_dir)?;
                let name = util::timestamped_file_name(
                    &self.config.file_prefix,
                    Local::now().naive_local(),
                    "csv",
                );
                self.config.output_dir.join(name)
            }
        };

        let written = write_records(&path, records)?;
        info!("wrote {written} visits to {}", path.display());
        Ok(Some(path))
    }
}
