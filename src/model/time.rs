//! Instant parsing and half-open time intervals.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

/// Parse a date/time string into a UTC instant.
///
/// Accepts RFC 3339 (`2025-05-01T18:00:00-04:00`), a naive date-time taken as
/// UTC (`2025-05-01T22:00:00`), or a bare date taken as midnight UTC.
/// Instants keep millisecond precision, the precision storage holds.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    parse_full_precision(value.trim()).map(|instant| instant.trunc_subsecs(3))
}

fn parse_full_precision(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format an instant the way proposals carry it (`2025-05-01T22:00:00Z`).
///
/// Fractional seconds are written only when present, so parsing the output
/// gives back the same instant.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// A `[start, end)` window with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Window of `minutes` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Option<Self> {
        Self::new(start, start + Duration::minutes(i64::from(minutes)))
    }

    /// Parse both bounds and build the interval.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The UTC calendar day the interval starts on, as `[00:00, next 00:00)`.
    pub fn utc_day(&self) -> Interval {
        utc_day_bounds(self.start)
    }
}

pub fn utc_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// `[midnight, next midnight)` in UTC around `instant`.
pub fn utc_day_bounds(instant: DateTime<Utc>) -> Interval {
    let start = Utc.from_utc_datetime(&instant.date_naive().and_time(chrono::NaiveTime::MIN));
    Interval {
        start,
        end: start + Duration::days(1),
    }
}

pub fn is_weekend(instant: DateTime<Utc>) -> bool {
    matches!(instant.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Hour of day (0-23) of `instant` on the wall clock of `zone`.
pub fn local_hour(instant: DateTime<Utc>, zone: Tz) -> u32 {
    instant.with_timezone(&zone).hour()
}
