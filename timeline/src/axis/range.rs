use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Months, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date window. Construction rejects `start > end`, so every value
/// in circulation is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawRange> for DateRange {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

/// Windows offered by the range picker, all ending at the as-of instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    Week,
    Month,
    Quarter,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn preset(preset: RangePreset, as_of: DateTime<Utc>) -> Result<Self> {
        let start = match preset {
            RangePreset::Week => as_of.checked_sub_signed(Duration::days(7)),
            RangePreset::Month => as_of.checked_sub_months(Months::new(1)),
            RangePreset::Quarter => as_of.checked_sub_months(Months::new(3)),
        }
        .ok_or(Error::RangeOutOfBounds)?;
        Self::new(start, as_of)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start <= date && date <= self.end
    }

    /// Fractional days from the range start to `date` (negative before it)
    pub fn days_from_start(&self, date: DateTime<Utc>) -> f64 {
        (date - self.start).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// Fractional length of the range in days
    pub fn span_days(&self) -> f64 {
        self.days_from_start(self.end)
    }

    /// One instant per calendar day the range touches: midnight of each day,
    /// or the range start itself on the first day
    pub fn days(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let start = self.start;
        let last = self.end.date_naive();
        start
            .date_naive()
            .iter_days()
            .take_while(move |day| *day <= last)
            .map(move |day| Utc.from_utc_datetime(&day.and_time(NaiveTime::default())).max(start))
    }
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;
