//! Rankings derived from visit records.
//!
//! Every record counts as one visit. Rankings keep first-seen order between
//! equal counts, so the output is deterministic for a given input order.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, TimeZone, Timelike};
use url::Url;

use crate::parsers::browser::VisitRecord;

/// Longest daily window, about ten years.
pub const MAX_DAILY_DAYS: u32 = 3660;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStat {
    pub domain: String,
    pub visit_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainRanking {
    pub top: Vec<DomainStat>,
    /// Visits to domains outside `top`.
    pub others: u64,
    /// Records whose URL had no parseable host.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStat {
    pub url: String,
    pub visit_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub visit_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyStat {
    pub hour: u32,
    pub visit_count: u64,
}

/// Host of `url`, lowercased, without a leading `www.` and without port.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    if host.is_empty() { None } else { Some(host) }
}

/// Count keys, most frequent first, ties in first-seen order.
fn count_ranked<I>(keys: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();
    for key in keys {
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn rank_domains(records: &[VisitRecord], top_n: usize) -> DomainRanking {
    let mut skipped = 0usize;
    let domains = records.iter().filter_map(|record| {
        let domain = domain_of(&record.url);
        if domain.is_none() {
            skipped += 1;
        }
        domain
    });
    let mut ranked = count_ranked(domains);

    let rest = ranked.split_off(top_n.min(ranked.len()));
    DomainRanking {
        top: ranked
            .into_iter()
            .map(|(domain, visit_count)| DomainStat { domain, visit_count })
            .collect(),
        others: rest.iter().map(|(_, count)| count).sum(),
        skipped,
    }
}

pub fn rank_urls(records: &[VisitRecord], top_n: usize) -> Vec<UrlStat> {
    count_ranked(records.iter().map(|record| record.url.clone()))
        .into_iter()
        .take(top_n)
        .map(|(url, visit_count)| UrlStat { url, visit_count })
        .collect()
}

/// Visits per local date over the `days` dates ending at `today`, oldest
/// first. Dates without visits are present with a zero count. The window is
/// capped at [`MAX_DAILY_DAYS`].
pub fn daily_activity<Tz: TimeZone>(
    records: &[VisitRecord],
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DailyStat> {
    let days = days.min(MAX_DAILY_DAYS);
    if days == 0 {
        return Vec::new();
    }
    let start = today
        .checked_sub_days(Days::new(u64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for record in records {
        let date = record.visit_time.with_timezone(tz).date_naive();
        if date >= start && date <= today {
            *counts.entry(date).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| DailyStat {
            date,
            visit_count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Visits per local hour of day; always 24 buckets.
pub fn hourly_distribution<Tz: TimeZone>(
    records: &[VisitRecord],
    tz: &Tz,
) -> Vec<HourlyStat> {
    let mut buckets = [0u64; 24];
    for record in records {
        let hour = record.visit_time.with_timezone(tz).hour() as usize;
        buckets[hour] += 1;
    }
    buckets
        .iter()
        .enumerate()
        .map(|(hour, &visit_count)| HourlyStat {
            hour: hour as u32,
            visit_count,
        })
        .collect()
}
