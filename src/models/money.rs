//! Money type for pay amounts
//!
//! Amounts are stored in öre (hundredths of a krona) as `i64` so pay
//! calculations never accumulate floating-point drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A monetary amount stored as öre
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from öre
    ///
    /// # Examples
    /// ```
    /// use tidrapport::models::Money;
    /// let amount = Money::from_ore(15050); // 150,50 kr
    /// ```
    pub const fn from_ore(ore: i64) -> Self {
        Self(ore)
    }

    /// Create a Money amount from whole kronor and öre
    pub const fn from_kronor_ore(kronor: i64, ore: i64) -> Self {
        Self(kronor * 100 + ore)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in öre
    pub const fn ore(&self) -> i64 {
        self.0
    }

    /// Whole kronor, truncated toward zero
    pub const fn kronor(&self) -> i64 {
        self.0 / 100
    }

    /// The öre portion (0-99)
    pub const fn ore_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiply by a factor, rounding half away from zero to the nearest öre
    pub fn scale(&self, factor: f64) -> Self {
        Self((self.0 as f64 * factor).round() as i64)
    }

    /// Take a percentage of this amount, rounded to the nearest öre
    pub fn percent(&self, percent: f64) -> Self {
        self.scale(percent / 100.0)
    }

    /// Plain decimal rendering with two places and a dot separator ("1234.50")
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.kronor().abs(), self.ore_part())
    }

    /// Parse an amount in kronor
    ///
    /// Accepts "150", "150.50", "150,50", "-20" and an optional "kr" suffix.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix("kr").unwrap_or(trimmed).trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let body = body.replace(',', ".");

        let ore = match body.split_once('.') {
            Some((kronor, fraction)) => {
                let kronor: i64 = kronor.parse().map_err(|_| invalid())?;
                let fraction: i64 = match fraction.len() {
                    0 => 0,
                    1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => fraction[..2].parse().map_err(|_| invalid())?,
                };
                kronor * 100 + fraction
            }
            None => body.parse::<i64>().map_err(|_| invalid())? * 100,
        };

        Ok(Self(if negative { -ore } else { ore }))
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
            write!(f, "-{},{:02} kr", self.kronor().abs(), self.ore_part())
        } else {
            write!(f, "{},{:02} kr", self.kronor(), self.ore_part())
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
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
