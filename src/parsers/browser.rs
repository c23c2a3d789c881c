use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Seconds between the WebKit epoch (1601-01-01) and the Unix epoch.
pub const WEBKIT_UNIX_OFFSET_SECONDS: i64 = 11_644_473_600;

/// The Unix epoch expressed as a WebKit timestamp.
pub const WEBKIT_UNIX_EPOCH: i64 = WEBKIT_UNIX_OFFSET_SECONDS * 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub url: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_visit_time")]
    pub visit_time: DateTime<Utc>,
    pub visit_count: i64,
}

impl VisitRecord {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        visit_time: DateTime<Utc>,
        visit_count: i64,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            visit_time,
            visit_count,
        }
    }
}

/// Convert microseconds since 1601-01-01 to UTC. Values before the Unix
/// epoch are treated as unset.
pub fn webkit_timestamp_to_datetime(microseconds: i64) -> Option<DateTime<Utc>> {
    if microseconds <= 0 {
        return None;
    }
    let secs = microseconds / 1_000_000 - WEBKIT_UNIX_OFFSET_SECONDS;
    if secs < 0 {
        return None;
    }
    let nsecs = ((microseconds % 1_000_000).abs() as u32) * 1000;
    DateTime::<Utc>::from_timestamp(secs, nsecs)
}

pub fn datetime_to_webkit_timestamp(time: DateTime<Utc>) -> i64 {
    (time.timestamp() + WEBKIT_UNIX_OFFSET_SECONDS) * 1_000_000
        + i64::from(time.timestamp_subsec_micros())
}

fn deserialize_visit_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_visit_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid visit_time: {raw}")))
}

/// Accepts RFC 3339 as well as naive `YYYY-MM-DD HH:MM:SS[.f]` values, which
/// are read as UTC.
pub fn parse_visit_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
