//! # Catalog State
//!
//! Session cache of the catalog plus the products visible under the active
//! category. Only successful fetches are cached, so a failed load is retried
//! on the next call.

use storefront_core::{Currency, Product};

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Option<Vec<Product>>,
    currencies: Option<Vec<Currency>>,
    visible: Vec<Product>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_products(&self) -> bool {
        self.products.is_some()
    }

    pub fn has_currencies(&self) -> bool {
        self.currencies.is_some()
    }

    pub fn store_products(&mut self, products: Vec<Product>) {
        self.products = Some(products);
    }

    pub fn store_currencies(&mut self, currencies: Vec<Currency>) {
        self.currencies = Some(currencies);
    }

    /// Recomputes the visible list from the cached catalog.
    pub fn refilter(&mut self, category: &str) -> &[Product] {
        self.visible = self
            .all_products()
            .iter()
            .filter(|product| product.belongs_to(category))
            .cloned()
            .collect();
        &self.visible
    }

    /// Products under the active category.
    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    /// Every cached product, empty before a successful fetch.
    pub fn all_products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or(&[])
    }

    pub fn currencies(&self) -> &[Currency] {
        self.currencies.as_deref().unwrap_or(&[])
    }

    /// Looks a cached product up by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.all_products().iter().find(|product| product.id == id)
    }
}
