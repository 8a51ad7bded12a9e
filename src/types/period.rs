//! Observation windows: a single calendar day or a calendar month.

use crate::error::SynopError;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A calendar month.
///
/// # Examples
///
/// ```
/// use synop::Month;
///
/// let february = Month::new(2024, 2).unwrap();
/// assert_eq!(february.last_day().to_string(), "2024-02-29");
/// assert!(Month::new(2024, 13).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` when `month` is not in `1..=12` or the year is out of
    /// chrono's range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Like [`Month::new`], but reports the invalid pair as a [`SynopError`].
    pub fn try_new(year: i32, month: u32) -> Result<Self, SynopError> {
        Self::new(year, month).ok_or(SynopError::InvalidMonth { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month, leap years included.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The time range an observation query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationWindow {
    Day(NaiveDate),
    Month(Month),
}

impl ObservationWindow {
    /// First and last calendar day covered, both inclusive.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match self {
            ObservationWindow::Day(date) => (*date, *date),
            ObservationWindow::Month(month) => (month.first_day(), month.last_day()),
        }
    }

    /// The catalog `where` predicate selecting this window.
    pub fn where_clause(&self) -> String {
        let (start, end) = self.bounds();
        format!(
            "date >= '{}T00:00:00Z' AND date <= '{}T23:59:59Z'",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    /// Key used in artifact file names: `2024-03-01` for a day, `2024_3` for a
    /// month.
    pub fn file_key(&self) -> String {
        match self {
            ObservationWindow::Day(date) => date.format("%Y-%m-%d").to_string(),
            ObservationWindow::Month(month) => format!("{}_{}", month.year(), month.month()),
        }
    }
}

impl fmt::Display for ObservationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationWindow::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ObservationWindow::Month(month) => write!(f, "{}", month),
        }
    }
}

/// Parses a `YYYY-MM-DD` date entered by a user.
pub fn parse_date(input: &str) -> Result<NaiveDate, SynopError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| SynopError::InvalidDate(trimmed.to_string(), e))
}
