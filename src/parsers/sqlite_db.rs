use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, warn};

use crate::error::HistoryError;
use crate::filter::TimeRange;
use crate::parsers::browser::{
    VisitRecord, WEBKIT_UNIX_EPOCH, datetime_to_webkit_timestamp, webkit_timestamp_to_datetime,
};

const REQUIRED_TABLES: [&str; 2] = ["urls", "visits"];

const VISITS_QUERY: &str = "SELECT urls.url, COALESCE(urls.title, ''), visits.visit_time, \
     COALESCE(urls.visit_count, 0) \
     FROM visits JOIN urls ON visits.url = urls.id \
     WHERE visits.visit_time >= ?1 AND (?2 IS NULL OR visits.visit_time < ?2) \
     ORDER BY visits.visit_time DESC, visits.id DESC \
     LIMIT ?3";

/// Read visits from a Chrome `History` database, most recent first.
///
/// `range` is translated to WebKit timestamps so the bounds are applied by
/// SQLite; visits dated before the Unix epoch are never returned.
pub fn extract_visits(
    path: &Path,
    range: &TimeRange,
    max_entries: Option<usize>,
) -> Result<Vec<VisitRecord>, HistoryError> {
    let access = |err: rusqlite::Error| HistoryError::access(path, err);

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(access)?;

    for table in REQUIRED_TABLES {
        if !has_table(&conn, table).map_err(access)? {
            return Err(HistoryError::access(path, format!("missing table `{table}`")));
        }
    }

    let start = range
        .start
        .map(datetime_to_webkit_timestamp)
        .map_or(WEBKIT_UNIX_EPOCH, |ts| ts.max(WEBKIT_UNIX_EPOCH));
    let end = range.end.map(datetime_to_webkit_timestamp);
    // SQLite treats a negative LIMIT as "no limit".
    let limit = max_entries.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
    debug!("querying visits start={start} end={end:?} limit={limit}");

    let mut stmt = conn.prepare(VISITS_QUERY).map_err(access)?;
    let rows = stmt
        .query_map(params![start, end, limit], |row| {
            let url: String = row.get(0)?;
            let title: String = row.get(1)?;
            let visit_time: i64 = row.get(2)?;
            let visit_count: i64 = row.get(3)?;
            Ok((url, title, visit_time, visit_count))
        })
        .map_err(access)?;

    let mut out = Vec::new();
    for row in rows {
        let (url, title, visit_time, visit_count) = row.map_err(access)?;
        match webkit_timestamp_to_datetime(visit_time) {
            Some(visit_time) => out.push(VisitRecord {
                url,
                title,
                visit_time,
                visit_count,
            }),
            None => warn!("skipping visit with unreadable timestamp {visit_time} for {url}"),
        }
    }

    Ok(out)
}

fn has_table(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let mut rows = stmt.query([name])?;
    Ok(rows.next()?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn build_history(path: &Path, visits: &[(&str, i64)]) {
        let conn = Connection::open(path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, title TEXT, visit_count INTEGER);
             CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER, visit_time INTEGER, \
                 transition INTEGER);",
        )
        .expect("create");
        for (idx, (url, visit_time)) in visits.iter().enumerate() {
            let id = idx as i64 + 1;
            conn.execute(
                "INSERT INTO urls (id, url, title, visit_count) VALUES (?1, ?2, ?3, 1)",
                (id, url, format!("title {id}")),
            )
            .expect("insert url");
            conn.execute(
                "INSERT INTO visits (url, visit_time, transition) VALUES (?1, ?2, 0)",
                (id, visit_time),
            )
            .expect("insert visit");
        }
    }

    #[test]
    fn returns_most_recent_first() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        build_history(
            &path,
            &[
                ("https://old.example", 13_303_449_600_000_000),
                ("https://new.example", 13_303_536_000_000_000),
                ("https://mid.example", 13_303_490_000_000_000),
            ],
        );

        let records = extract_visits(&path, &TimeRange::default(), None).expect("visits");
        let urls: Vec<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://new.example", "https://mid.example", "https://old.example"]);
        assert_eq!(records[0].title, "title 2");
        assert_eq!(records[0].visit_count, 1);
    }

    #[test]
    fn null_title_becomes_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        build_history(&path, &[("https://example.com", 13_303_449_600_000_000)]);
        let conn = Connection::open(&path).expect("conn");
        conn.execute("UPDATE urls SET title = NULL", []).expect("update");
        drop(conn);

        let records = extract_visits(&path, &TimeRange::default(), None).expect("visits");
        assert_eq!(records[0].title, "");
    }

    #[test]
    fn drops_pre_unix_visits() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        build_history(
            &path,
            &[
                ("https://zero.example", 0),
                ("https://ok.example", 13_303_449_600_000_000),
            ],
        );

        let records = extract_visits(&path, &TimeRange::default(), None).expect("visits");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://ok.example");
        assert_eq!(records[0].visit_time, Utc.with_ymd_and_hms(2022, 7, 27, 0, 0, 0).unwrap());
    }

    #[test]
    fn missing_visits_table_is_access_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        let conn = Connection::open(&path).expect("conn");
        conn.execute("CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT)", [])
            .expect("create");
        drop(conn);

        let err = extract_visits(&path, &TimeRange::default(), None).unwrap_err();
        match err {
            HistoryError::DatabaseAccess { reason, .. } => assert!(reason.contains("visits")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_file_is_access_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        std::fs::write(&path, vec![0x42u8; 4096]).expect("write");

        let err = extract_visits(&path, &TimeRange::default(), None).unwrap_err();
        assert!(matches!(err, HistoryError::DatabaseAccess { .. }));
    }
}
