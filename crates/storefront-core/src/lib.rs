//! # storefront-core: Pure Cart Logic for the Storefront
//!
//! This crate is the **heart** of the storefront cart engine. It contains
//! the cart rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View Layer (out of scope)                    │   │
//! │  │    Product grid ──► Product page ──► Cart ──► Checkout          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ user intents                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront-session (Storefront engine)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │  │  price  │ │attribute │ │  cart   │ │  totals  │ │ money  │  │   │
//! │  │  │resolver │ │ matcher  │ │ index + │ │ payable  │ │ cents  │  │   │
//! │  │  │         │ │          │ │ mutator │ │  + tax   │ │        │  │   │
//! │  │  └─────────┘ └──────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog records (Product, PriceEntry, attribute groups)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`price`] - Price resolver with the multi-currency fallback chain
//! - [`attribute`] - Attribute selection equivalence
//! - [`cart`] - Cart lines, identity index and add/remove mutator
//! - [`totals`] - Payable total and tax aggregation
//! - [`validation`] - Input checks for currency and category intents
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{compute_totals, Cart, PriceEntry, Product};
//!
//! let mut hoodie = Product::new("hoodie", "Hoodie");
//! hoodie.prices = vec![PriceEntry::new(10.0, "USD", "$")];
//!
//! let mut cart = Cart::new();
//! cart.add_item(&hoodie, &[]);
//! cart.add_item(&hoodie, &[]);
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total_quantity(), 2);
//!
//! let totals = compute_totals(&cart, "$");
//! assert_eq!(totals.payable.cents(), 2000);
//! assert_eq!(totals.tax_amount.cents(), 420);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attribute;
pub mod cart;
pub mod error;
pub mod money;
pub mod price;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use attribute::{selections_equivalent, AttributeSelection, SelectedAttribute};
pub use cart::{Cart, CartLine, RemoveOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use price::{resolve_price, PriceSource, ResolvedPrice};
pub use totals::{compute_totals, compute_totals_with_rate, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol used when nothing has been selected or persisted yet.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Category that disables catalog filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Standard tax rate applied to the payable total, in basis points (21%).
pub const STANDARD_TAX_RATE_BPS: u32 = 2100;

/// Image shown when a product has neither a gallery nor a single image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Brand shown when a product record carries none.
pub const FALLBACK_BRAND: &str = "Brand";
