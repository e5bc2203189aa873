//! # Catalog Repository
//!
//! Product records and currencies served to the session as the catalog
//! collaborator.
//!
//! ## Document Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog_products                                                       │
//! │  ┌────────────────────┬──────────┬──────────┬──────────────────────────┐│
//! │  │ id                 │ category │ position │ document (JSON)          ││
//! │  ├────────────────────┼──────────┼──────────┼──────────────────────────┤│
//! │  │ huarache-x-stussy  │ clothes  │ 0        │ {"id": ..., "prices":[]} ││
//! │  │ ps-5               │ tech     │ 1        │ {"id": ..., "price": 5}  ││
//! │  └────────────────────┴──────────┴──────────┴──────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are kept as the JSON the catalog backend shipped, so both price
//! shapes survive untouched. A row whose document no longer decodes is
//! skipped with a warning instead of failing the whole listing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use storefront_core::{Currency, Product};

/// Repository for catalog products and currencies.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists every product in display order.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT id, document FROM catalog_products ORDER BY position, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let products: Vec<Product> = rows
            .into_iter()
            .filter_map(|(id, document)| decode_product(&id, &document))
            .collect();

        debug!(total, decoded = products.len(), "Catalog products listed");
        Ok(products)
    }

    /// Gets a single product by ID.
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM catalog_products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(document.and_then(|doc| decode_product(id, &doc)))
    }

    /// Inserts or replaces a product document.
    pub async fn upsert_product(&self, product: &Product, position: i64) -> DbResult<()> {
        let document = serde_json::to_string(product)?;

        sqlx::query(
            r#"
            INSERT INTO catalog_products (id, category, position, document, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                position = excluded.position,
                document = excluded.document,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(product.category.as_deref())
        .bind(position)
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(product_id = %product.id, "Catalog product upserted");
        Ok(())
    }

    /// Stores a raw JSON document as-is (used to import backend exports).
    pub async fn upsert_raw_document(
        &self,
        id: &str,
        category: Option<&str>,
        position: i64,
        document: &str,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_products (id, category, position, document, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                position = excluded.position,
                document = excluded.document,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(category)
        .bind(position)
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Counts stored product documents (decodable or not).
    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Lists currencies in display order.
    pub async fn list_currencies(&self) -> DbResult<Vec<Currency>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT label, symbol FROM catalog_currencies ORDER BY position, symbol",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(label, symbol)| Currency { label, symbol })
            .collect())
    }

    /// Inserts or replaces a currency.
    pub async fn upsert_currency(&self, currency: &Currency, position: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_currencies (symbol, label, position)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(symbol) DO UPDATE SET
                label = excluded.label,
                position = excluded.position
            "#,
        )
        .bind(&currency.symbol)
        .bind(&currency.label)
        .bind(position)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn decode_product(id: &str, document: &str) -> Option<Product> {
    match serde_json::from_str::<Product>(document) {
        Ok(mut product) => {
            if product.id.is_empty() {
                product.id = id.to_string();
            }
            Some(product)
        }
        Err(e) => {
            warn!(product_id = %id, error = %e, "Skipping malformed catalog document");
            None
        }
    }
}
