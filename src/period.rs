//! Calendar arithmetic for day, week and month partitions.
//!
//! Everything here is pure. Functions that could step outside chrono's
//! representable range return `None` instead of panicking.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PartitionError;

/// Partitioning granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Retention used when a configuration leaves `retain` unset
    pub fn default_retain(&self) -> u32 {
        match self {
            Period::Day => 7,
            Period::Week => 4,
            Period::Month => 6,
        }
    }

    /// Aligns `date` down to the first day of its containing period.
    ///
    /// Weeks start on Monday (ISO weekday 1).
    pub fn anchor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset))
                    .unwrap_or(NaiveDate::MIN)
            }
            Period::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Exclusive end of the period beginning at `start`.
    ///
    /// Months advance by calendar month, so 2020-01-31 ends on 2020-02-29.
    pub fn period_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Day => start.checked_add_days(Days::new(1)),
            Period::Week => start.checked_add_days(Days::new(7)),
            Period::Month => start.checked_add_months(Months::new(1)),
        }
    }

    /// Earliest period start that is still kept. Anything strictly older
    /// than this date may be dropped.
    pub fn retention_cutoff(&self, anchored_start: NaiveDate, retain: u32) -> Option<NaiveDate> {
        match self {
            Period::Day => anchored_start.checked_sub_days(Days::new(u64::from(retain))),
            Period::Week => anchored_start.checked_sub_days(Days::new(u64::from(retain) * 7)),
            Period::Month => anchored_start.checked_sub_months(Months::new(retain)),
        }
    }

    /// Successive, contiguous periods beginning at `start`
    pub fn periods(&self, start: NaiveDate) -> Periods {
        Periods {
            period: *self,
            next: Some(start),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PartitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(PartitionError::InvalidPeriod(other.to_string())),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = PartitionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.as_str().to_string()
    }
}

/// One partition's time range, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Iterator returned by [`Period::periods`]. Stops if the calendar runs out.
#[derive(Debug, Clone)]
pub struct Periods {
    period: Period,
    next: Option<NaiveDate>,
}

impl Iterator for Periods {
    type Item = PeriodRange;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let end = self.period.period_end(start);
        self.next = end;
        end.map(|end| PeriodRange { start, end })
    }
}
