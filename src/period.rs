//! Calendar-month reporting periods

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{LedgerError, LedgerResult};

/// A calendar month. Expenses belong to the period their date falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        // Both bounds must be representable dates
        let period = Self { year, month };
        period.try_start()?;
        period.try_end()?;
        Ok(period)
    }

    /// The period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start(&self) -> NaiveDate {
        // Validated in `new`, `containing` only builds from real dates
        self.try_start().unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month (exclusive bound)
    pub fn end(&self) -> NaiveDate {
        self.try_end().unwrap_or(NaiveDate::MAX)
    }

    /// Whether `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        (self.end() - self.start()).num_days() as u32
    }

    fn try_start(&self) -> LedgerResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| {
            LedgerError::InvalidPeriod(format!("{}-{:02} is out of range", self.year, self.month))
        })
    }

    fn try_end(&self) -> LedgerResult<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            LedgerError::InvalidPeriod(format!("{}-{:02} is out of range", self.year, self.month))
        })
    }
}

/// Unvalidated wire form of [`Period`]
#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for Period {
    type Error = LedgerError;

    fn try_from(raw: RawPeriod) -> LedgerResult<Self> {
        Period::new(raw.year, raw.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
