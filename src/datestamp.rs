//! Calendar date stamps used as folder names and index keys

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A normalized year-month-day value.
///
/// Renders as `YYYY-MM-DD`, which is both the name given to newly created
/// library folders and the key under which existing folders are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datestamp {
    date: NaiveDate,
}

impl Datestamp {
    /// Build a datestamp from a 1-based month and day.
    ///
    /// Out-of-range values roll over using calendar arithmetic: month 13 is
    /// January of the following year, day 32 spills into the next month and
    /// day 0 is the last day of the previous month.
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Self {
        let months = i64::from(year) * 12 + i64::from(month) - 1;
        let year = months.div_euclid(12);
        let month0 = months.rem_euclid(12) as u32;

        let first = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month0 + 1, 1))
            .unwrap_or(if year < 0 { NaiveDate::MIN } else { NaiveDate::MAX });

        let offset = i64::from(day) - 1;
        let date = if offset >= 0 {
            first.checked_add_days(Days::new(offset as u64))
        } else {
            first.checked_sub_days(Days::new(offset.unsigned_abs()))
        }
        .unwrap_or(if offset < 0 { NaiveDate::MIN } else { NaiveDate::MAX });

        Self { date }
    }

    /// Wrap an already valid calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Build from the three digit groups captured by a date regex
    pub(crate) fn from_captures(year: &str, month: &str, day: &str) -> Option<Self> {
        Some(Self::from_ymd(
            year.parse().ok()?,
            month.parse().ok()?,
            day.parse().ok()?,
        ))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl fmt::Display for Datestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}

impl FromStr for Datestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self::from_date)
    }
}

impl From<NaiveDate> for Datestamp {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}
