//! # Storefront Session Engine
//!
//! One shopper session: the cart, the selected currency, the active
//! category and the catalog cache, with the collaborators they are loaded
//! from and saved to.
//!
//! ## Intent Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_item(product, selection)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartState::apply ── Cart::add_item ── identity lookup ── qty+1 / push │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist "cartItems", then "productsQuantity"   (failures logged)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  recompute totals in the selected currency ──► CartSummary             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degradation
//! No intent fails because a collaborator did. Persisted values that are
//! missing or malformed fall back to defaults, catalog failures yield empty
//! lists, and write failures leave the in-memory state authoritative. Only
//! invalid currency or category input is returned as an error.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use storefront_core::validation::{validate_category, validate_currency_symbol, ValidationResult};
use storefront_core::{Cart, CartLine, Currency, Product, RemoveOutcome, SelectedAttribute, Totals};
use storefront_db::{CatalogRepository, Database, DbConfig, SessionRepository};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogFetch, CatalogSnapshot, CatalogSource};
use crate::error::{SessionError, SessionResult};
use crate::state::{
    CartState, CartSummary, CatalogState, ConfigState, ACTIVE_CATEGORY_KEY, CART_ITEMS_KEY,
    PRODUCTS_QUANTITY_KEY, SELECTED_CURRENCY_KEY,
};
use crate::store::KeyValueStore;

/// Snapshot of a completed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub currency: String,
    pub total_quantity: u64,
    pub placed_at: DateTime<Utc>,
}

/// The session engine.
pub struct Storefront<S, C> {
    store: S,
    catalog: C,
    config: ConfigState,
    cart: CartState,
    catalog_state: CatalogState,
    currency: String,
    category: String,
}

impl<S, C> Storefront<S, C>
where
    S: KeyValueStore,
    C: CatalogSource,
{
    // =========================================================================
    // Session start
    // =========================================================================

    /// Opens a session, rehydrating every persisted value independently.
    pub async fn open(store: S, catalog: C, config: ConfigState) -> Self {
        let category = read_text(&store, ACTIVE_CATEGORY_KEY, validate_category)
            .await
            .unwrap_or_else(|| config.default_category.clone());

        let currency = read_text(&store, SELECTED_CURRENCY_KEY, validate_currency_symbol)
            .await
            .unwrap_or_else(|| config.default_currency.clone());

        let raw_cart = read_raw(&store, CART_ITEMS_KEY).await;
        let cart = CartState::restore(raw_cart.as_deref());

        let raw_quantity = read_raw(&store, PRODUCTS_QUANTITY_KEY).await;
        let stored_quantity = CartState::decode_quantity(raw_quantity.as_deref());

        let mut session = Storefront {
            store,
            catalog,
            config,
            cart,
            catalog_state: CatalogState::new(),
            currency,
            category,
        };

        let actual = session.cart.total_quantity();
        if stored_quantity != Some(actual) && (stored_quantity.is_some() || actual > 0) {
            warn!(
                stored = ?stored_quantity,
                actual,
                "Persisted quantity disagrees with cart, rewriting"
            );
            session.persist_quantity().await;
        }

        session.compute_totals();

        info!(
            lines = session.cart.cart().len(),
            quantity = actual,
            currency = %session.currency,
            category = %session.category,
            "Session opened"
        );
        session
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetches products and currencies unless already cached, then applies
    /// the category filter. Returns the visible products.
    ///
    /// Holds the session for the whole fetch. Callers that need cart intents
    /// to go through meanwhile use [`Storefront::catalog_fetch`] and
    /// [`Storefront::apply_catalog`] instead.
    pub async fn load_catalog(&mut self) -> &[Product]
    where
        C: Clone,
    {
        let snapshot = self.catalog_fetch().run().await;
        self.apply_catalog(snapshot)
    }

    /// Prepares a read of whatever the cache is missing. The fetch owns a
    /// clone of the source and borrows nothing from the session.
    pub fn catalog_fetch(&self) -> CatalogFetch<C>
    where
        C: Clone,
    {
        CatalogFetch::new(
            self.catalog.clone(),
            !self.catalog_state.has_products(),
            !self.catalog_state.has_currencies(),
        )
    }

    /// Caches the successful parts of `snapshot` and refilters. Lists that
    /// are already cached are kept. Returns the visible products.
    pub fn apply_catalog(&mut self, snapshot: CatalogSnapshot) -> &[Product] {
        if let Some(products) = snapshot.products {
            if !self.catalog_state.has_products() {
                self.catalog_state.store_products(products);
            }
        }
        if let Some(currencies) = snapshot.currencies {
            if !self.catalog_state.has_currencies() {
                self.catalog_state.store_currencies(currencies);
            }
        }
        self.catalog_state.refilter(&self.category)
    }

    // =========================================================================
    // Cart intents
    // =========================================================================

    /// Adds one unit of `product` configured with `selection`.
    pub async fn add_item(
        &mut self,
        product: &Product,
        selection: &[SelectedAttribute],
    ) -> CartSummary {
        let quantity = self
            .cart
            .apply(|cart| cart.add_item(product, selection).quantity);
        debug!(product_id = %product.id, quantity, "Item added");

        self.persist_cart().await;
        self.compute_totals();
        self.summary()
    }

    /// Removes one unit of the line matching `product_id` and `selection`.
    /// A missing line leaves the cart untouched.
    pub async fn remove_item(
        &mut self,
        product_id: &str,
        selection: &[SelectedAttribute],
    ) -> CartSummary {
        let outcome = self
            .cart
            .apply(|cart| cart.remove_item(product_id, selection));

        match outcome {
            RemoveOutcome::NotFound => {
                debug!(product_id = %product_id, "Remove ignored, no matching line")
            }
            RemoveOutcome::Decremented { remaining } => {
                debug!(product_id = %product_id, remaining, "Item decremented")
            }
            RemoveOutcome::Removed => debug!(product_id = %product_id, "Line removed"),
        }

        if outcome.changed() {
            self.persist_cart().await;
        }
        self.compute_totals();
        self.summary()
    }

    /// Empties the cart and forgets both persisted cart keys.
    pub async fn clear_cart(&mut self) -> CartSummary {
        self.cart.apply(Cart::clear);

        for key in [CART_ITEMS_KEY, PRODUCTS_QUANTITY_KEY] {
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "Failed to remove persisted cart value");
            }
        }

        info!("Cart cleared");
        self.compute_totals();
        self.summary()
    }

    /// Places the order: snapshots the cart and clears it.
    ///
    /// Returns `None` for an empty cart.
    pub async fn complete_order(&mut self) -> Option<OrderSummary> {
        if self.cart.cart().is_empty() {
            debug!("Order ignored, cart is empty");
            return None;
        }

        let totals = self.compute_totals();
        let order = OrderSummary {
            lines: self.cart.cart().lines().to_vec(),
            totals,
            currency: self.currency.clone(),
            total_quantity: self.cart.total_quantity(),
            placed_at: Utc::now(),
        };

        info!(
            lines = order.lines.len(),
            payable = %order.totals.payable,
            currency = %order.currency,
            "Order completed"
        );

        self.clear_cart().await;
        Some(order)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Switches the display currency and recomputes totals.
    pub async fn change_currency(&mut self, symbol: &str) -> SessionResult<Totals> {
        let symbol = validate_currency_symbol(symbol)?;
        debug!(from = %self.currency, to = %symbol, "Currency changed");

        self.currency = symbol;
        self.persist_json(SELECTED_CURRENCY_KEY, &self.currency).await;
        Ok(self.compute_totals())
    }

    /// Switches the category filter. Returns the newly visible products.
    pub async fn change_category(&mut self, category: &str) -> SessionResult<&[Product]> {
        let category = validate_category(category)?;
        debug!(from = %self.category, to = %category, "Category changed");

        self.category = category;
        self.persist_json(ACTIVE_CATEGORY_KEY, &self.category).await;
        Ok(self.catalog_state.refilter(&self.category))
    }

    /// Full totals recompute for the current cart and currency.
    pub fn compute_totals(&mut self) -> Totals {
        self.cart
            .recompute_totals(&self.currency, self.config.tax_rate())
    }

    // =========================================================================
    // Read-only state
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    pub fn totals(&self) -> Totals {
        self.cart.totals()
    }

    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Products visible under the active category.
    pub fn products(&self) -> &[Product] {
        self.catalog_state.visible()
    }

    pub fn currencies(&self) -> &[Currency] {
        self.catalog_state.currencies()
    }

    /// Cached product by id, for detail views.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.catalog_state.product(id)
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn summary(&self) -> CartSummary {
        self.cart.summary(&self.currency)
    }

    /// Formats an amount in the selected currency.
    pub fn format_amount(&self, amount: storefront_core::Money) -> String {
        self.config.format_currency(&self.currency, amount)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn persist_cart(&self) {
        match self.cart.cart().to_json() {
            Ok(json) => self.persist_raw(CART_ITEMS_KEY, &json).await,
            Err(e) => warn!(error = %e, "Failed to encode cart"),
        }
        self.persist_quantity().await;
    }

    async fn persist_quantity(&self) {
        let quantity = self.cart.total_quantity().to_string();
        self.persist_raw(PRODUCTS_QUANTITY_KEY, &quantity).await;
    }

    async fn persist_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.persist_raw(key, &json).await,
            Err(e) => warn!(key, error = %e, "Failed to encode value"),
        }
    }

    async fn persist_raw(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value).await {
            warn!(key, error = %e, "Failed to persist session value");
        }
    }
}

impl Storefront<SessionRepository, CatalogRepository> {
    /// Opens a session backed by an already connected database.
    pub async fn open_database(db: &Database, config: ConfigState) -> Self {
        Self::open(db.session(), db.catalog(), config).await
    }

    /// Opens a session backed by the SQLite file from `config`.
    pub async fn open_sqlite(config: ConfigState) -> SessionResult<Self> {
        let path = config.database_path()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::internal(format!("Could not create {}: {}", parent.display(), e))
            })?;
        }

        let db = Database::new(DbConfig::new(&path)).await?;
        Ok(Self::open_database(&db, config).await)
    }
}

// =============================================================================
// Rehydration helpers
// =============================================================================

/// Reads a key, treating a backend failure as absent.
async fn read_raw<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted value, using default");
            None
        }
    }
}

/// Reads a JSON value, treating malformed content as absent.
async fn read_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = read_raw(store, key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Persisted value is malformed, using default");
            None
        }
    }
}

/// Reads a JSON string and validates it.
async fn read_text<S: KeyValueStore>(
    store: &S,
    key: &str,
    validate: fn(&str) -> ValidationResult<String>,
) -> Option<String> {
    let text: String = read_json(store, key).await?;
    match validate(&text) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(key, error = %e, "Persisted value is invalid, using default");
            None
        }
    }
}
