//! # Cart State
//!
//! The session's cart together with the values derived from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Intent               Storefront              Cart State Change         │
//! │  ──────               ──────────              ─────────────────         │
//! │                                                                         │
//! │  Add to cart ───────► add_item() ───────────► qty + 1 or push line      │
//! │                                                                         │
//! │  Minus button ──────► remove_item() ────────► qty - 1 or drop line      │
//! │                                                                         │
//! │  Clear ─────────────► clear_cart() ─────────► lines.clear()             │
//! │                                                                         │
//! │  Currency change ───► change_currency() ────► totals recomputed         │
//! │                                                                         │
//! │  Every change goes through `apply`, which keeps total_quantity in       │
//! │  step with the lines.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::{compute_totals_with_rate, Cart, TaxRate, Totals};
use tracing::warn;

/// Cart plus its derived quantity and totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    cart: Cart,
    total_quantity: u64,
    totals: Totals,
}

impl CartState {
    /// Creates an empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing cart. Totals stay zero until recomputed.
    pub fn from_cart(cart: Cart) -> Self {
        let total_quantity = cart.total_quantity();
        CartState {
            cart,
            total_quantity,
            totals: Totals::zero(),
        }
    }

    /// Rebuilds the cart from its persisted JSON.
    ///
    /// Missing or malformed input yields an empty cart.
    pub fn restore(raw_cart: Option<&str>) -> Self {
        let Some(raw) = raw_cart else {
            return Self::new();
        };

        match Cart::from_json(raw) {
            Ok(cart) => Self::from_cart(cart),
            Err(e) => {
                warn!(error = %e, "Persisted cart is malformed, starting empty");
                Self::new()
            }
        }
    }

    /// Decodes a persisted total quantity. Anything but a non-negative
    /// integer is treated as absent.
    pub fn decode_quantity(raw: Option<&str>) -> Option<u64> {
        raw.and_then(|raw| serde_json::from_str::<u64>(raw).ok())
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Runs a mutation on the cart and resyncs the total quantity.
    pub fn apply<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let result = f(&mut self.cart);
        self.total_quantity = self.cart.total_quantity();
        result
    }

    /// Full totals recompute for `currency_symbol`.
    pub fn recompute_totals(&mut self, currency_symbol: &str, rate: TaxRate) -> Totals {
        self.totals = compute_totals_with_rate(&self.cart, currency_symbol, rate);
        self.totals
    }

    /// Summary for the view layer.
    pub fn summary(&self, currency_symbol: &str) -> CartSummary {
        CartSummary {
            line_count: self.cart.len(),
            total_quantity: self.total_quantity,
            totals: self.totals,
            currency: currency_symbol.to_string(),
        }
    }
}

/// Cart summary returned after every cart intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub line_count: usize,
    pub total_quantity: u64,
    pub totals: Totals,
    pub currency: String,
}
