use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MonthError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    Format(String),
    #[error("month out of range: {year}-{month}")]
    OutOfRange { year: i32, month: u32 },
}

/// A calendar month. Always holds a valid month number (1..=12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        // from_ymd_opt also rejects years chrono cannot represent
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthError::OutOfRange { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
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

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Every day of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..self.days_in_month()).map(move |offset| first + Duration::days(offset as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Long label for headers, e.g. "March 2024".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year_str, month_str) = s
            .split_once('-')
            .ok_or_else(|| MonthError::Format(s.to_string()))?;
        let year: i32 = year_str.parse().map_err(|_| MonthError::Format(s.to_string()))?;
        let month: u32 = month_str.parse().map_err(|_| MonthError::Format(s.to_string()))?;
        Self::new(year, month)
    }
}
