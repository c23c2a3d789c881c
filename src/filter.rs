//! Filter criteria applied to the history query.
//!
//! A [`HistoryFilter`] can only be built through its validating constructors,
//! so a filter that reaches the extractor always satisfies
//! `start_date <= end_date`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::HistoryError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Step used to walk past a local-time gap; no zone offset change is finer.
const GAP_STEP_MINUTES: i64 = 15;
/// Longest gap searched, one full day.
const MAX_GAP_STEPS: i64 = 24 * 60 / GAP_STEP_MINUTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryFilter {
    max_entries: Option<usize>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Half-open UTC interval `[start, end)`. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| time >= start) && self.end.is_none_or(|end| time < end)
    }
}

impl HistoryFilter {
    /// Whole history, no limit.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(
        max_entries: Option<usize>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, HistoryError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(HistoryError::InvalidDateRange(format!(
                    "start date {start} is after end date {end}"
                )));
            }
        }
        Ok(Self {
            max_entries,
            start_date,
            end_date,
        })
    }

    pub fn today(max_entries: Option<usize>, today: NaiveDate) -> Self {
        Self {
            max_entries,
            start_date: Some(today),
            end_date: Some(today),
        }
    }

    /// Build a filter from raw command-line values. `today` wins over explicit
    /// bounds; date strings must be `YYYY-MM-DD`.
    pub fn from_args(
        max_entries: Option<usize>,
        today_only: bool,
        start_date: Option<&str>,
        end_date: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, HistoryError> {
        if today_only {
            return Ok(Self::today(max_entries, today));
        }
        let start = start_date.map(parse_date).transpose()?;
        let end = end_date.map(parse_date).transpose()?;
        Self::new(max_entries, start, end)
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Translate the calendar bounds, read in `tz`, into a UTC interval. The
    /// end date is inclusive, so the interval closes at the following midnight.
    pub fn time_range<Tz: TimeZone>(&self, tz: &Tz) -> TimeRange {
        TimeRange {
            start: self.start_date.map(|date| start_of_day(date, tz)),
            end: self
                .end_date
                .and_then(|date| date.succ_opt())
                .map(|date| start_of_day(date, tz)),
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, HistoryError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|err| {
        HistoryError::InvalidDateRange(format!(
            "invalid date '{raw}' (expected YYYY-MM-DD): {err}"
        ))
    })
}

/// First instant of `date` in `tz`. When a transition skips local midnight
/// the day starts at the first local time after the gap.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=MAX_GAP_STEPS)
        .map(|step| midnight + Duration::minutes(step * GAP_STEP_MINUTES))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
