//! Money type for representing fund amounts
//!
//! Internally stores amounts in paisa (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as paisa (hundredths of a taka)
///
/// Using i64 paisa avoids floating-point precision issues; fund balances can
/// go negative (expenses exceeding collections), so the type stays signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from paisa
    ///
    /// # Examples
    /// ```
    /// use vdf_ledger::models::Money;
    /// let amount = Money::from_paisa(1050); // ৳10.50
    /// ```
    pub const fn from_paisa(paisa: i64) -> Self {
        Self(paisa)
    }

    /// Create a Money amount from whole taka
    ///
    /// # Examples
    /// ```
    /// use vdf_ledger::models::Money;
    /// let amount = Money::from_taka(20); // ৳20.00
    /// ```
    pub const fn from_taka(taka: i64) -> Self {
        Self(taka * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in paisa
    pub const fn paisa(&self) -> i64 {
        self.0
    }

    /// Get the whole-taka portion (truncated toward zero)
    pub const fn taka(&self) -> i64 {
        self.0 / 100
    }

    /// Get the paisa portion (0-99)
    pub const fn paisa_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp negative amounts to zero
    ///
    /// Dues figures are floored here so an overpaying family never reports a
    /// negative balance due.
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            *self
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "৳10.50", "Tk 10.50", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        // Handle negative sign at start
        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        // Remove currency markers if present
        let s = s.strip_prefix('৳').unwrap_or(s);
        let s = s.strip_prefix("Tk").unwrap_or(s).trim_start();

        // Parse based on format
        let paisa = if s.contains('.') {
            // Decimal format: "10.50"
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let taka: i64 = parts[0]
                .parse()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

            // Pad or truncate paisa to 2 digits
            let paisa_str = parts[1];
            let paisa: i64 = match paisa_str.len() {
                0 => 0,
                1 => {
                    paisa_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => paisa_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            taka * 100 + paisa
        } else {
            // Integer format - assume whole taka
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                * 100
        };

        Ok(Self(if negative { -paisa } else { paisa }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.taka().abs(), self.paisa_part())
        } else {
            format!("{}{}.{:02}", symbol, self.taka(), self.paisa_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-৳{}.{:02}", self.taka().abs(), self.paisa_part())
        } else {
            write!(f, "৳{}.{:02}", self.taka(), self.paisa_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paisa() {
        let m = Money::from_paisa(1050);
        assert_eq!(m.paisa(), 1050);
        assert_eq!(m.taka(), 10);
        assert_eq!(m.paisa_part(), 50);
    }

    #[test]
    fn test_from_taka() {
        let m = Money::from_taka(20);
        assert_eq!(m.paisa(), 2000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paisa(1050)), "৳10.50");
        assert_eq!(format!("{}", Money::from_paisa(0)), "৳0.00");
        assert_eq!(format!("{}", Money::from_paisa(-1050)), "-৳10.50");
        assert_eq!(format!("{}", Money::from_paisa(5)), "৳0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paisa(1000);
        let b = Money::from_paisa(500);

        assert_eq!((a + b).paisa(), 1500);
        assert_eq!((a - b).paisa(), 500);
        assert_eq!((-a).paisa(), -1000);
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_paisa(-500).floor_zero(), Money::zero());
        assert_eq!(Money::from_paisa(500).floor_zero(), Money::from_paisa(500));
        assert_eq!(Money::zero().floor_zero(), Money::zero());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().paisa(), 1050);
        assert_eq!(Money::parse("৳10.50").unwrap().paisa(), 1050);
        assert_eq!(Money::parse("Tk 10.50").unwrap().paisa(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().paisa(), -1050);
        assert_eq!(Money::parse("10").unwrap().paisa(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().paisa(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().paisa(), 5);
    }

    #[test]
    fn test_comparison() {
        let a = Money::from_paisa(1000);
        let b = Money::from_paisa(500);
        let c = Money::from_paisa(1000);

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, c);
    }

    #[test]
    fn test_is_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paisa(100).is_positive());
        assert!(Money::from_paisa(-100).is_negative());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_paisa(100),
            Money::from_paisa(200),
            Money::from_paisa(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.paisa(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_paisa(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
