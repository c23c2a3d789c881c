//! Shared fixtures: Chrome-shaped `History` databases and sample records.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;

use chrome_history::config::{ExtractorConfig, VisualizerConfig};
use chrome_history::parsers::browser::{VisitRecord, datetime_to_webkit_timestamp};

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// Create a `History` file with one `urls` row per distinct URL and one
/// `visits` row per entry.
pub fn create_history_db(path: &Path, visits: &[(&str, &str, DateTime<Utc>)]) {
    let conn = Connection::open(path).expect("conn");
    conn.execute_batch(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
             visit_count INTEGER DEFAULT 0 NOT NULL, \
             last_visit_time INTEGER NOT NULL DEFAULT 0);
         CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER NOT NULL, \
             visit_time INTEGER NOT NULL, from_visit INTEGER, \
             transition INTEGER DEFAULT 0 NOT NULL, \
             visit_duration INTEGER DEFAULT 0 NOT NULL);",
    )
    .expect("schema");

    for (url, title, time) in visits {
        let webkit = datetime_to_webkit_timestamp(*time);
        conn.execute(
            "INSERT INTO urls (url, title) SELECT ?1, ?2 \
             WHERE NOT EXISTS (SELECT 1 FROM urls WHERE url = ?1)",
            (url, title),
        )
        .expect("insert url");
        conn.execute(
            "UPDATE urls SET visit_count = visit_count + 1, \
             last_visit_time = MAX(last_visit_time, ?2) WHERE url = ?1",
            (url, webkit),
        )
        .expect("update url");
        conn.execute(
            "INSERT INTO visits (url, visit_time) SELECT id, ?2 FROM urls WHERE url = ?1",
            (url, webkit),
        )
        .expect("insert visit");
    }
}

/// Visits spread over three days in May 2024, in insertion (not time) order.
pub fn sample_visits() -> Vec<(&'static str, &'static str, DateTime<Utc>)> {
    vec![
        ("https://a.com/1", "A one", utc(2024, 5, 1, 0, 0, 0)),
        ("https://b.com/", "B", utc(2024, 5, 2, 12, 30, 0)),
        ("https://a.com/2", "A two", utc(2024, 5, 2, 23, 59, 59)),
        ("https://c.com/", "C", utc(2024, 5, 3, 0, 0, 0)),
        ("https://a.com/1", "A one", utc(2024, 4, 30, 23, 59, 59)),
        ("https://b.com/", "B", utc(2024, 5, 3, 8, 0, 0)),
    ]
}

pub fn extractor_config(db_path: &Path, work_dir: &Path) -> ExtractorConfig {
    ExtractorConfig {
        database_path: Some(db_path.to_path_buf()),
        output_dir: work_dir.join("history_data"),
        scratch_dir: Some(scratch_dir(work_dir)),
        ..ExtractorConfig::default()
    }
}

pub fn scratch_dir(work_dir: &Path) -> PathBuf {
    let dir = work_dir.join("scratch");
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

pub fn visualizer_config(output_dir: &Path) -> VisualizerConfig {
    VisualizerConfig {
        output_dir: output_dir.to_path_buf(),
        ..VisualizerConfig::default()
    }
}

pub fn record(url: &str, time: DateTime<Utc>) -> VisitRecord {
    VisitRecord::new(url, format!("title of {url}"), time, 1)
}
