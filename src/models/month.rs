//! Calendar-month token used throughout the ledger
//!
//! Contributions, exemptions, and requirement overrides are all keyed at
//! month granularity. The canonical text form is the `YYYY-MM` token, which
//! is also how the type serializes.

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single calendar month (year + month number)
///
/// Month is always in 1..=12; construction validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current calendar month
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// January of the given year
    pub fn start_of_year(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// December of the given year
    pub fn end_of_year(year: i32) -> Self {
        Self { year, month: 12 }
    }

    /// Get the year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Get the month number (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The canonical `YYYY-MM` token
    pub fn token(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// First day of this month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap())
    }

    /// Last day of this month (inclusive)
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    /// The following month
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

    /// The preceding month
    pub fn prev(&self) -> Self {
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

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Iterate every month from `self` through `end`, inclusive
    ///
    /// Empty when `self > end`. This is the month-walk the dues calculation
    /// is built on.
    pub fn months_through(self, end: MonthYear) -> MonthRange {
        MonthRange {
            next: if self <= end { Some(self) } else { None },
            end,
        }
    }

    /// Parse a `YYYY-MM` token
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(MonthParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

/// Inclusive month-by-month iterator
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<MonthYear>,
    end: MonthYear,
}

impl Iterator for MonthRange {
    type Item = MonthYear;

    fn next(&mut self) -> Option<MonthYear> {
        let current = self.next?;
        self.next = if current < self.end {
            Some(current.next())
        } else {
            None
        };
        Some(current)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthYear {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Persisted as the token string so data files stay greppable.

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MonthYear::parse(&s).map_err(D::Error::custom)
    }
}

/// Error type for month-token parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthParseError::InvalidFormat(s) => write!(f, "Invalid month token: {}", s),
            MonthParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_month() {
        assert!(MonthYear::new(2024, 1).is_ok());
        assert!(MonthYear::new(2024, 12).is_ok());
        assert_eq!(
            MonthYear::new(2024, 0),
            Err(MonthParseError::InvalidMonth(0))
        );
        assert_eq!(
            MonthYear::new(2024, 13),
            Err(MonthParseError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_token_and_display() {
        let m = MonthYear::new(2024, 3).unwrap();
        assert_eq!(m.token(), "2024-03");
        assert_eq!(format!("{}", m), "2024-03");
    }

    #[test]
    fn test_parse() {
        let m = MonthYear::parse("2024-03").unwrap();
        assert_eq!(m.year(), 2024);
        assert_eq!(m.month(), 3);

        assert!(matches!(
            MonthYear::parse("2024-13"),
            Err(MonthParseError::InvalidMonth(13))
        ));
        assert!(matches!(
            MonthYear::parse("March 2024"),
            Err(MonthParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            MonthYear::parse("2024"),
            Err(MonthParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_navigation() {
        let dec = MonthYear::new(2024, 12).unwrap();
        assert_eq!(dec.next(), MonthYear::new(2025, 1).unwrap());

        let jan = MonthYear::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), dec);
    }

    #[test]
    fn test_days() {
        let feb = MonthYear::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        // 2024 is a leap year
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_ordering() {
        let a = MonthYear::new(2024, 11).unwrap();
        let b = MonthYear::new(2024, 12).unwrap();
        let c = MonthYear::new(2025, 1).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_months_through() {
        let start = MonthYear::new(2024, 11).unwrap();
        let end = MonthYear::new(2025, 2).unwrap();
        let months: Vec<String> = start.months_through(end).map(|m| m.token()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_months_through_single() {
        let m = MonthYear::new(2024, 5).unwrap();
        let months: Vec<MonthYear> = m.months_through(m).collect();
        assert_eq!(months, vec![m]);
    }

    #[test]
    fn test_months_through_empty_when_start_after_end() {
        let start = MonthYear::new(2025, 1).unwrap();
        let end = MonthYear::new(2024, 12).unwrap();
        assert_eq!(start.months_through(end).count(), 0);
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(MonthYear::from_date(date), MonthYear::new(2024, 7).unwrap());
    }

    #[test]
    fn test_serialization_as_token() {
        let m = MonthYear::new(2024, 3).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2024-03\"");

        let deserialized: MonthYear = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);

        let bad: Result<MonthYear, _> = serde_json::from_str("\"2024-13\"");
        assert!(bad.is_err());
    }
}
