//! # State Module
//!
//! Explicit state objects owned by the [`Storefront`](crate::Storefront).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartState   │  │ CatalogState │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  cart        │  │  products?   │  │  default_currency│              │
//! │  │  quantity    │  │  currencies? │  │  default_category│              │
//! │  │  totals      │  │  visible     │  │  tax_rate_bps    │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  CartState: loaded at open, saved after every mutation                 │
//! │  CatalogState: filled by load_catalog, never persisted                 │
//! │  ConfigState: read-only after open                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;

pub use cart::{CartState, CartSummary};
pub use catalog::CatalogState;
pub use config::ConfigState;

// =============================================================================
// Persistence Keys
// =============================================================================

/// Active category filter (JSON string).
pub const ACTIVE_CATEGORY_KEY: &str = "activeCategory";

/// Selected currency symbol (JSON string).
pub const SELECTED_CURRENCY_KEY: &str = "selectedCurrency";

/// Serialized cart lines (JSON list).
pub const CART_ITEMS_KEY: &str = "cartItems";

/// Sum of cart line quantities (JSON number).
pub const PRODUCTS_QUANTITY_KEY: &str = "productsQuantity";
