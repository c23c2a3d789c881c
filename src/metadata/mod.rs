//! CSV export and import of visit records.

pub mod csv;

pub use self::csv::{CsvSink, load_records, write_records};
