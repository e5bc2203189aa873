//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog amounts arrive as JSON numbers:                                │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: convert once, then add integers                          │
//! │    from_decimal(144.69) ──► 14469 cents                                 │
//! │    14469 × 2 + 550 = 29488 cents (exact)                                │
//! │                                                                         │
//! │  Sums of catalog amounts use micros (1 cent = 10 000) and round once:   │
//! │    0.125 × 2 ──► 250 000 micros ──► 25 cents                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_decimal(10.99);
//! assert_eq!(price.cents(), 1099);
//!
//! let doubled = price * 2u32;
//! assert_eq!(doubled.to_string(), "21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Sub-cent units per cent, used while summing unrounded amounts.
pub const MICROS_PER_CENT: i128 = 10_000;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// The currency itself is not part of the value: the cart prices every line
/// in the currency the shopper has selected, so all amounts that are summed
/// together always share one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a catalog amount (major units, e.g. `10.99`) into cents.
    ///
    /// ## Rounding
    /// Rounds half away from zero to two decimal places.
    ///
    /// Non-finite input (NaN, ±∞) yields zero.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(5.5).cents(), 550);
    /// assert_eq!(Money::from_decimal(0.125).cents(), 13);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money::from_micros(Money::decimal_to_micros(amount))
    }

    /// Converts a catalog amount into micros without losing sub-cent digits.
    ///
    /// Non-finite input yields zero; out-of-range input saturates.
    pub fn decimal_to_micros(amount: f64) -> i128 {
        if !amount.is_finite() {
            return 0;
        }
        // `as` saturates at the i128 bounds
        (amount * MICROS_PER_UNIT).round() as i128
    }

    /// Rounds micros half away from zero to whole cents, saturating at the
    /// i64 bounds.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_micros(250_000).cents(), 25);
    /// assert_eq!(Money::from_micros(125_000).cents(), 13);
    /// assert_eq!(Money::from_micros(i128::MAX).cents(), i64::MAX);
    /// ```
    pub fn from_micros(micros: i128) -> Self {
        let half = MICROS_PER_CENT / 2;
        let cents = if micros >= 0 {
            micros.saturating_add(half) / MICROS_PER_CENT
        } else {
            micros.saturating_sub(half) / MICROS_PER_CENT
        };
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units, for display and JSON interop only.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The `+5000` rounds
    /// the half-cent up for non-negative amounts, which is the only case the
    /// cart produces.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let payable = Money::from_cents(2550);
    /// let tax = payable.calculate_tax(TaxRate::from_bps(2100));
    /// // 25.50 × 21% = 5.355 → 5.36
    /// assert_eq!(tax.cents(), 536);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps huge carts from overflowing the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Formats the value with a currency symbol in front, e.g. `£25.50`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.units().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering without a symbol (`25.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
