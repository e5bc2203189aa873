//! # Price Resolver
//!
//! Turns a product record and a target currency symbol into one concrete
//! amount, whatever shape the catalog used for the price.
//!
//! ## Fallback Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_price(product, "£")                                            │
//! │       │                                                                 │
//! │       ├── prices[] has a "£" entry? ──────────► that entry     Matched  │
//! │       │                                                                 │
//! │       ├── prices[] non-empty? ────────────────► prices[0]  FirstListed  │
//! │       │                                         (degraded, not an error)│
//! │       ├── price present? ─────────────────────► {price, "£"}  Single    │
//! │       │                                                                 │
//! │       └── otherwise ──────────────────────────► {0, "£"}      Missing   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver never fails and never returns a negative amount: catalog
//! data is heterogeneous and must never block rendering or totals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// Which branch of the fallback chain produced a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PriceSource {
    /// The price list had an entry in the requested currency.
    Matched,
    /// The price list had no such entry; its first entry was used.
    FirstListed,
    /// The single numeric price was used.
    SinglePrice,
    /// Nothing usable; the amount is zero.
    Missing,
}

/// Outcome of [`resolve_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResolvedPrice {
    /// Unit amount rounded to the cent, for display.
    pub amount: Money,
    /// Unit amount as listed, clamped to be non-negative. Totals sum this.
    pub exact_amount: f64,
    pub currency_symbol: String,
    pub source: PriceSource,
}

impl ResolvedPrice {
    fn new(amount: f64, symbol: &str, source: PriceSource) -> Self {
        let exact_amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        ResolvedPrice {
            amount: Money::from_decimal(exact_amount),
            exact_amount,
            currency_symbol: symbol.to_string(),
            source,
        }
    }

    /// Whether the price is in a different currency than requested.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.source == PriceSource::FirstListed
    }
}

/// Resolves the unit price of `product` in `currency_symbol`.
///
/// ```rust
/// use storefront_core::{resolve_price, PriceEntry, Product};
///
/// let mut product = Product::new("p", "Shirt");
/// product.prices = vec![
///     PriceEntry::new(10.0, "USD", "$"),
///     PriceEntry::new(8.5, "GBP", "£"),
/// ];
///
/// let price = resolve_price(&product, "£");
/// assert_eq!(price.amount.cents(), 850);
/// assert_eq!(price.currency_symbol, "£");
/// ```
pub fn resolve_price(product: &Product, currency_symbol: &str) -> ResolvedPrice {
    if let Some(first) = product.prices.first() {
        return match product
            .prices
            .iter()
            .find(|entry| entry.currency_symbol() == currency_symbol)
        {
            Some(entry) => ResolvedPrice::new(
                entry.amount,
                entry.currency_symbol(),
                PriceSource::Matched,
            ),
            None => ResolvedPrice::new(
                first.amount,
                first.currency_symbol(),
                PriceSource::FirstListed,
            ),
        };
    }

    match product.price {
        Some(amount) => ResolvedPrice::new(amount, currency_symbol, PriceSource::SinglePrice),
        None => ResolvedPrice::new(0.0, currency_symbol, PriceSource::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceEntry;
    use proptest::prelude::*;

    fn listed(prices: Vec<PriceEntry>) -> Product {
        let mut product = Product::new("p", "Listed");
        product.prices = prices;
        product
    }

    #[test]
    fn test_matching_entry_wins() {
        let product = listed(vec![
            PriceEntry::new(10.0, "USD", "$"),
            PriceEntry::new(8.5, "GBP", "£"),
        ]);
        let price = resolve_price(&product, "£");

        assert_eq!(price.amount.cents(), 850);
        assert_eq!(price.currency_symbol, "£");
        assert_eq!(price.source, PriceSource::Matched);
    }

    #[test]
    fn test_unknown_currency_degrades_to_first_entry() {
        let product = listed(vec![
            PriceEntry::new(10.0, "USD", "$"),
            PriceEntry::new(8.5, "GBP", "£"),
        ]);
        let price = resolve_price(&product, "¥");

        assert_eq!(price.amount.cents(), 1000);
        assert_eq!(price.currency_symbol, "$");
        assert!(price.is_degraded());
    }

    #[test]
    fn test_single_price_uses_requested_symbol() {
        let mut product = Product::new("p", "Mug");
        product.price = Some(12.5);
        let price = resolve_price(&product, "€");

        assert_eq!(price.amount.cents(), 1250);
        assert_eq!(price.currency_symbol, "€");
        assert_eq!(price.source, PriceSource::SinglePrice);
    }

    #[test]
    fn test_price_list_beats_single_price() {
        let mut product = listed(vec![PriceEntry::new(3.0, "USD", "$")]);
        product.price = Some(99.0);
        assert_eq!(resolve_price(&product, "$").amount.cents(), 300);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let price = resolve_price(&Product::new("p", "Bare"), "$");
        assert!(price.amount.is_zero());
        assert_eq!(price.currency_symbol, "$");
        assert_eq!(price.source, PriceSource::Missing);
    }

    #[test]
    fn test_negative_amount_is_clamped() {
        let mut product = Product::new("p", "Broken");
        product.price = Some(-4.0);
        assert!(resolve_price(&product, "$").amount.is_zero());
    }

    proptest! {
        #[test]
        fn prop_amount_never_negative(
            amounts in proptest::collection::vec(-1.0e9f64..1.0e9, 0..4),
            single in proptest::option::of(-1.0e9f64..1.0e9),
            symbol in "[$£€¥]",
        ) {
            let mut product = Product::new("p", "Any");
            product.prices = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| PriceEntry::new(*a, "X", ["$", "£", "€", "¥"][i % 4]))
                .collect();
            product.price = single;

            let price = resolve_price(&product, &symbol);
            prop_assert!(!price.amount.is_negative());
            prop_assert!(price.exact_amount >= 0.0);
        }

        #[test]
        fn prop_exact_entry_returned(amount in 0.0f64..1.0e6) {
            let product = listed(vec![
                PriceEntry::new(1.0, "USD", "$"),
                PriceEntry::new(amount, "GBP", "£"),
            ]);
            let price = resolve_price(&product, "£");
            prop_assert_eq!(price.amount, Money::from_decimal(amount));
            prop_assert_eq!(price.currency_symbol.as_str(), "£");
        }
    }
}
