//! # storefront-session: Session Engine for the Storefront
//!
//! The boundary the view layer talks to. A [`Storefront`] owns one shopper's
//! cart, selected currency and active category, loads them when the session
//! opens and saves them after every change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  View layer (product list, cart overlay, cart page)                    │
//! │       │ add_item / remove_item / change_currency / change_category     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               storefront-session (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   Storefront ──► CartState / CatalogState / ConfigState         │   │
//! │  │       │                                                         │   │
//! │  │       ├──► dyn KeyValueStore  (MemoryStore, SessionRepository)  │   │
//! │  │       └──► dyn CatalogSource  (StaticCatalog, CatalogRepository)│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storefront-core (cart rules)        storefront-db (SQLite)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_session::{ConfigState, MemoryStore, StaticCatalog, Storefront};
//!
//! let mut shop = Storefront::open(store, catalog, ConfigState::from_env()).await;
//! shop.load_catalog().await;
//!
//! let summary = shop.add_item(&product, &selection).await;
//! shop.change_currency("£").await?;
//! println!("{}", shop.format_amount(shop.totals().payable));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod state;
pub mod store;
pub mod storefront;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{CatalogFetch, CatalogSnapshot, CatalogSource, StaticCatalog};
pub use error::{CatalogError, ErrorCode, SessionError, SessionResult, StoreError};
pub use state::{CartState, CartSummary, CatalogState, ConfigState};
pub use store::{KeyValueStore, MemoryStore};
pub use storefront::{OrderSummary, Storefront};
pub use telemetry::init_tracing;
