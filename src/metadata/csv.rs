use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::HistoryError;
use crate::parsers::browser::VisitRecord;

const HEADER: [&str; 4] = ["url", "title", "visit_time", "visit_count"];

/// Writes visit rows to a temporary file beside `path`. The target only
/// appears once [`CsvSink::finish`] succeeds; a dropped sink leaves nothing.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<NamedTempFile>,
    rows: usize,
}

#[derive(Serialize)]
struct VisitRecordCsv<'a> {
    url: &'a str,
    title: &'a str,
    visit_time: String,
    visit_count: i64,
}

impl CsvSink {
    /// Stage a new export for `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self, HistoryError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp);
        writer.write_record(HEADER)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn record(&mut self, record: &VisitRecord) -> Result<(), HistoryError> {
        let row = VisitRecordCsv {
            url: &record.url,
            title: &record.title,
            visit_time: record
                .visit_time
                .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            visit_count: record.visit_count,
        };
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush the staged rows and move them onto the target path, replacing
    /// any previous file there.
    pub fn finish(self) -> Result<(PathBuf, usize), HistoryError> {
        let temp = self.writer.into_inner().map_err(|err| err.into_error())?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        Ok((self.path, self.rows))
    }
}

pub fn write_records(path: &Path, records: &[VisitRecord]) -> Result<usize, HistoryError> {
    let mut sink = CsvSink::create(path)?;
    for record in records {
        sink.record(record)?;
    }
    let (_, rows) = sink.finish()?;
    Ok(rows)
}

/// Load visit records from a CSV export. Only `.csv` files are accepted.
pub fn load_records(path: &Path) -> Result<Vec<VisitRecord>, HistoryError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(HistoryError::UnsupportedFormat(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for row in reader.deserialize() {
        let record: VisitRecord = row?;
        out.push(record);
    }
    Ok(out)
}
