//! # Money Module
//!
//! Integer-cent monetary values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    4 × 2.10 = 8.400000000000000355  ❌                                  │
//! │                                                                         │
//! │  A sale total must equal quantity × unit price EXACTLY, and revenue    │
//! │  sums over thousands of sales must not drift.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    4 × 210 cents = 840 cents, always                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(200); // 2.00
//! let total = price.checked_mul_quantity(4).unwrap();
//! assert_eq!(total.cents(), 800);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Serializes as a bare integer, so `Money::from_cents(800)` is `800` on the
/// wire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` on overflow instead of wrapping.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(250).checked_mul_quantity(3), Some(Money::from_cents(750)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Divides by a count, rounding half away from zero to the nearest cent.
    ///
    /// A divisor of zero (or below) yields zero: an average over nothing is
    /// reported as 0, never a panic.
    ///
    /// ## Implementation
    /// Integer math only: `(2 × amount + divisor) / (2 × divisor)` for
    /// positive amounts, mirrored for negative ones.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// // 10.00 / 3 = 3.333.. → 3.33
    /// assert_eq!(Money::from_cents(1000).div_rounded(3).cents(), 333);
    /// // 10.00 / 8 = 1.25 exactly
    /// assert_eq!(Money::from_cents(1000).div_rounded(8).cents(), 125);
    /// // 0.05 / 2 = 0.025 → 0.03
    /// assert_eq!(Money::from_cents(5).div_rounded(2).cents(), 3);
    /// assert_eq!(Money::from_cents(500).div_rounded(0).cents(), 0);
    /// ```
    pub fn div_rounded(&self, divisor: i64) -> Money {
        if divisor <= 0 {
            return Money::zero();
        }

        let amount = self.0 as i128;
        let divisor = divisor as i128;
        let rounded = if amount >= 0 {
            (2 * amount + divisor) / (2 * divisor)
        } else {
            -((2 * -amount + divisor) / (2 * divisor))
        };

        Money(rounded as i64)
    }
}

/// Displays as major units with two decimals: `Money::from_cents(-550)` is `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
