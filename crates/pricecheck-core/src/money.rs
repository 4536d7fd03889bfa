//! # Money Module
//!
//! Provides the `Money` type for prices shown on the kiosk.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BACKEND PRICES ARRIVE IN TWO SHAPES                                    │
//! │                                                                         │
//! │    "Precio": "2500.5"    (numeric string)                              │
//! │    "Precio": 19.5        (JSON number)                                 │
//! │                                                                         │
//! │  Both are parsed as decimals (never f64), rounded to cents once,       │
//! │  and stored as integer cents. Display always shows two decimals:       │
//! │                                                                         │
//! │    "2500.5" ──► 250050 cents ──► "$2500.50"                            │
//! │     19.5    ──►   1950 cents ──►   "$19.50"                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricecheck_core::money::Money;
//!
//! let price = Money::parse_price("2500.5").unwrap();
//! assert_eq!(price.cents(), 250050);
//! assert_eq!(price.to_string(), "$2500.50");
//! assert_eq!(price.amount(), "2500.50");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative price in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// backend row "Precio" ──► Money::parse_price ──► Product.price
///                                                     │
///                                                     ▼
///                                     price view: "$2500.50"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use pricecheck_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds a price from a decimal, rounding half away from zero to cents.
    ///
    /// Negative values are rejected: a shelf price is never negative.
    pub fn from_decimal(value: Decimal) -> CoreResult<Self> {
        if value < Decimal::ZERO {
            return Err(CoreError::invalid_price(value.to_string(), "must not be negative"));
        }

        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or_else(|| CoreError::invalid_price(value.to_string(), "out of range"))?;

        Ok(Money(cents))
    }

    /// Parses a backend price string.
    ///
    /// ## Rules
    /// - Empty or whitespace-only → zero (the price column was blank)
    /// - Plain decimals (`"19.5"`) and scientific notation (`"1e3"`)
    /// - Anything else → `CoreError::InvalidPrice`
    ///
    /// ## Example
    /// ```rust
    /// use pricecheck_core::money::Money;
    ///
    /// assert_eq!(Money::parse_price("19.5").unwrap().amount(), "19.50");
    /// assert_eq!(Money::parse_price("").unwrap(), Money::zero());
    /// assert!(Money::parse_price("abc").is_err());
    /// ```
    pub fn parse_price(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Money::zero());
        }

        let value = Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|e| CoreError::invalid_price(raw, e.to_string()))?;

        Money::from_decimal(value)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The amount with exactly two decimals and no symbol (`"19.50"`).
    pub fn amount(&self) -> String {
        format!("{}.{:02}", self.dollars(), self.cents_part())
    }

    /// The amount prefixed with a currency symbol (`"€19.50"`).
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.amount())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Dollar display, used by the default kiosk configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.amount())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_cents(1950).to_string(), "$19.50");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_parse_numeric_string() {
        let price = Money::parse_price("2500.5").unwrap();
        assert_eq!(price.cents(), 250050);
        assert_eq!(price.to_string(), "$2500.50");
    }

    #[test]
    fn test_parse_rounds_half_away_from_zero() {
        assert_eq!(Money::parse_price("1.005").unwrap().cents(), 101);
        assert_eq!(Money::parse_price("1.004").unwrap().cents(), 100);
        assert_eq!(Money::parse_price("  3 ").unwrap().cents(), 300);
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(Money::parse_price("1e3").unwrap().cents(), 100_000);
    }

    #[test]
    fn test_parse_blank_is_zero() {
        assert!(Money::parse_price("").unwrap().is_zero());
        assert!(Money::parse_price("   ").unwrap().is_zero());
    }

    #[test]
    fn test_parse_rejects_garbage_and_negative() {
        assert!(matches!(
            Money::parse_price("12,50"),
            Err(CoreError::InvalidPrice { .. })
        ));
        assert!(matches!(
            Money::parse_price("-4"),
            Err(CoreError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_format_with_symbol() {
        let price = Money::from_cents(250050);
        assert_eq!(price.format_with_symbol("€"), "€2500.50");
        assert_eq!(price.format_with_symbol(""), "2500.50");
    }
}
