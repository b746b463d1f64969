//! Calendar-month partition keys.
//!
//! Every report lands in the partition derived from its own submit time,
//! evaluated in the server's local time zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

// Clamp bounds keep every derived year at four digits in any UTC offset.
const MIN_DERIVABLE_MS: i64 = -62_135_510_400_000; // 0001-01-02T00:00:00Z
const MAX_DERIVABLE_MS: i64 = 253_370_764_800_000; // 9998-12-31T00:00:00Z

/// A `YYYY-MM` month partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthPartition {
    year: i32,
    month: u32,
}

impl MonthPartition {
    const EARLIEST: Self = Self { year: 1, month: 1 };
    const LATEST: Self = Self { year: 9998, month: 12 };

    /// Partition for a millisecond epoch timestamp, in local time.
    ///
    /// Total: timestamps outside chrono's comfortable range are clamped.
    pub fn derive(timestamp_ms: i64) -> Self {
        let clamped = timestamp_ms.clamp(MIN_DERIVABLE_MS, MAX_DERIVABLE_MS);
        match DateTime::<Utc>::from_timestamp_millis(clamped) {
            Some(utc) => Self::from_datetime(&utc.with_timezone(&Local)),
            None if clamped < 0 => Self::EARLIEST,
            None => Self::LATEST,
        }
    }

    /// Partition for a point in time, in that value's own time zone.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Parse a caller-supplied `YYYY-MM` string.
    ///
    /// # Errors
    ///
    /// `ReportError::InvalidPartition` unless the input is exactly four
    /// ASCII digits, a hyphen and a two-digit month in `01..=12`.
    pub fn parse(value: &str) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidPartition {
            value: value.to_string(),
        };

        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year, month) = (&value[..4], &value[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthPartition {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthPartition {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthPartition> for String {
    fn from(partition: MonthPartition) -> Self {
        partition.to_string()
    }
}
