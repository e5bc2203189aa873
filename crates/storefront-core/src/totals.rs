//! # Totals Aggregator
//!
//! Recomputes the payable total and tax from the full cart.
//!
//! ```text
//! for each line:  resolve_price(line.product, currency) × line.quantity
//!                                  │  (unrounded, in micros)
//!                                  ▼
//!                 payable = Σ, rounded once to the cent
//!                                  │
//!                                  ▼
//!                 tax = payable × 21%, rounded half-up to the cent
//! ```
//!
//! There is no incremental update: every change to the cart or the selected
//! currency triggers a full pass. Carts are small enough that this is cheap.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::TaxRate;

/// Derived cart totals in the selected currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Sum of line totals.
    pub payable: Money,

    /// Tax on `payable`. Informational; not added to `payable`.
    pub tax_amount: Money,
}

impl Totals {
    /// Totals of an empty cart.
    pub const fn zero() -> Self {
        Totals {
            payable: Money::zero(),
            tax_amount: Money::zero(),
        }
    }
}

/// Computes totals with the standard 21% tax rate.
pub fn compute_totals(cart: &Cart, currency_symbol: &str) -> Totals {
    compute_totals_with_rate(cart, currency_symbol, TaxRate::default())
}

/// Computes totals with an explicit tax rate.
///
/// Line amounts are summed before rounding; the sum saturates rather than
/// overflowing on absurd catalog prices.
pub fn compute_totals_with_rate(cart: &Cart, currency_symbol: &str, rate: TaxRate) -> Totals {
    let micros = cart
        .lines()
        .iter()
        .map(|line| line.line_micros(currency_symbol))
        .fold(0i128, i128::saturating_add);
    let payable = Money::from_micros(micros);

    Totals {
        payable,
        tax_amount: payable.calculate_tax(rate),
    }
}
