//! # Catalog Collaborator
//!
//! Where products and currencies come from. The session reads each list at
//! most once and never waits on it before applying a cart intent.
//!
//! ```text
//! Storefront::catalog_fetch(&self) ──► CatalogFetch { own source handle }
//!                                             │ run().await
//!   add_item / remove_item keep                │   (no session borrow)
//!   running against the session                ▼
//! Storefront::apply_catalog(&mut self, CatalogSnapshot)
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use storefront_core::{Currency, Product};
use storefront_db::CatalogRepository;
use tracing::{info, warn};

use crate::error::CatalogError;

/// Read-only catalog source.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every product the storefront lists.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Every currency a shopper can pick.
    async fn fetch_all_currencies(&self) -> Result<Vec<Currency>, CatalogError>;
}

// =============================================================================
// Fetch outside the session
// =============================================================================

/// Lists read by a [`CatalogFetch`]. `None` means not requested or failed.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub products: Option<Vec<Product>>,
    pub currencies: Option<Vec<Currency>>,
}

/// A catalog read that owns its handle to the source, so the session can
/// keep applying cart intents while it is pending.
#[derive(Debug, Clone)]
pub struct CatalogFetch<C> {
    source: C,
    products: bool,
    currencies: bool,
}

impl<C: CatalogSource> CatalogFetch<C> {
    /// Reads the lists flagged `true` from `source`.
    pub fn new(source: C, products: bool, currencies: bool) -> Self {
        CatalogFetch {
            source,
            products,
            currencies,
        }
    }

    /// Whether there is nothing left to fetch.
    pub fn is_empty(&self) -> bool {
        !self.products && !self.currencies
    }

    /// Runs the requested fetches. Failures are logged and come back as `None`.
    pub async fn run(self) -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::default();

        if self.products {
            match self.source.fetch_all_products().await {
                Ok(products) => {
                    info!(count = products.len(), "Catalog products loaded");
                    snapshot.products = Some(products);
                }
                Err(e) => warn!(error = %e, "Error fetching products, showing none"),
            }
        }

        if self.currencies {
            match self.source.fetch_all_currencies().await {
                Ok(currencies) => {
                    info!(count = currencies.len(), "Currencies loaded");
                    snapshot.currencies = Some(currencies);
                }
                Err(e) => warn!(error = %e, "Error fetching currencies, showing none"),
            }
        }

        snapshot
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Fixed in-memory catalog.
///
/// `set_failing(true)` makes every fetch fail, which is how tests exercise
/// the empty-catalog fallback. Clones share the failure switch and the
/// fetch counter.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Arc<Vec<Product>>,
    currencies: Arc<Vec<Currency>>,
    failing: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, currencies: Vec<Currency>) -> Self {
        StaticCatalog {
            products: Arc::new(products),
            currencies: Arc::new(currencies),
            ..Self::default()
        }
    }

    /// A catalog whose every fetch fails.
    pub fn unavailable() -> Self {
        let catalog = Self::default();
        catalog.set_failing(true);
        catalog
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetch calls served so far (successful or not).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("static catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.check()?;
        Ok(self.products.as_ref().clone())
    }

    async fn fetch_all_currencies(&self) -> Result<Vec<Currency>, CatalogError> {
        self.check()?;
        Ok(self.currencies.as_ref().clone())
    }
}

#[async_trait]
impl CatalogSource for CatalogRepository {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.list_products().await?)
    }

    async fn fetch_all_currencies(&self) -> Result<Vec<Currency>, CatalogError> {
        Ok(self.list_currencies().await?)
    }
}
