//! Range bound encodings for child partitions.
//!
//! Tables keyed by a date column take the period's dates as bounds.
//! Tables keyed by a ULID column need bounds that pin every identifier
//! minted during the period, so the timestamp prefix is padded with the
//! lowest or highest character of the Crockford alphabet.

use chrono::NaiveDate;
use ulid::Ulid;

use crate::error::{PartitionError, Result};
use crate::period::PeriodRange;

/// Turns a period into the raw `from` / `to` values of a range partition
pub trait BoundEncoder: Send + Sync {
    fn lower(&self, range: &PeriodRange) -> Result<String>;
    fn upper(&self, range: &PeriodRange) -> Result<String>;
}

/// `from ('2019-10-11') to ('2019-10-12')`
#[derive(Debug, Default, Clone, Copy)]
pub struct DateBounds;

impl BoundEncoder for DateBounds {
    fn lower(&self, range: &PeriodRange) -> Result<String> {
        Ok(range.start.format("%Y-%m-%d").to_string())
    }

    fn upper(&self, range: &PeriodRange) -> Result<String> {
        Ok(range.end.format("%Y-%m-%d").to_string())
    }
}

const ULID_TIMESTAMP_LEN: usize = 10;
const ULID_RANDOM_LEN: usize = 16;
const CROCKFORD_MIN: char = '0';
const CROCKFORD_MAX: char = 'Z';

/// Bounds for ULID keys, taken at UTC midnight.
///
/// The lower bound is the first identifier possible at `start`, the upper
/// bound the last one possible one second before `end`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidBounds;

impl UlidBounds {
    /// Timestamp characters of a ULID minted `back_millis` before midnight of `at`
    fn prefix(at: NaiveDate, back_millis: i64) -> Result<String> {
        let out_of_range = || PartitionError::BoundOutOfRange(at);
        let midnight = at.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?;
        let millis = midnight.and_utc().timestamp_millis() - back_millis;
        let millis = u64::try_from(millis).map_err(|_| out_of_range())?;
        if millis >= 1 << 48 {
            return Err(out_of_range());
        }

        let mut encoded = Ulid::from_parts(millis, 0).to_string();
        encoded.truncate(ULID_TIMESTAMP_LEN);
        Ok(encoded)
    }

    fn pad(mut prefix: String, fill: char) -> String {
        prefix.extend(std::iter::repeat(fill).take(ULID_RANDOM_LEN));
        prefix
    }
}

impl BoundEncoder for UlidBounds {
    fn lower(&self, range: &PeriodRange) -> Result<String> {
        let prefix = Self::prefix(range.start, 0)?;
        Ok(Self::pad(prefix, CROCKFORD_MIN))
    }

    fn upper(&self, range: &PeriodRange) -> Result<String> {
        // ids minted in the last 999 ms before `end` sort above this bound
        let prefix = Self::prefix(range.end, 1_000)?;
        Ok(Self::pad(prefix, CROCKFORD_MAX))
    }
}

/// Encoder matching a configuration's `ulid` flag
pub fn for_config(ulid: bool) -> Box<dyn BoundEncoder> {
    if ulid {
        Box::new(UlidBounds)
    } else {
        Box::new(DateBounds)
    }
}
