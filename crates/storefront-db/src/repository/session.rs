//! # Session Repository
//!
//! String-keyed storage for the values a shopper's session must survive a
//! reload with: active category, selected currency, serialized cart and
//! total quantity.
//!
//! Values are opaque strings here. Encoding, decoding and the fallback for
//! corrupted values belong to the session layer.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `session_kv` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM session_kv WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Session value read");
        Ok(value)
    }

    /// Inserts or replaces the value stored under `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Session value written");
        Ok(())
    }

    /// Deletes `key`. Returns whether a row existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM session_kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Session value removed");
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every stored key.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM session_kv")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.session();

        assert_eq!(repo.get("selectedCurrency").await.unwrap(), None);

        repo.set("selectedCurrency", "\"$\"").await.unwrap();
        assert_eq!(
            repo.get("selectedCurrency").await.unwrap().as_deref(),
            Some("\"$\"")
        );

        repo.set("selectedCurrency", "\"£\"").await.unwrap();
        assert_eq!(
            repo.get("selectedCurrency").await.unwrap().as_deref(),
            Some("\"£\"")
        );
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.session();

        repo.set("cartItems", "[]").await.unwrap();
        repo.set("productsQuantity", "0").await.unwrap();

        assert!(repo.remove("cartItems").await.unwrap());
        assert!(!repo.remove("cartItems").await.unwrap());
        assert_eq!(repo.get("cartItems").await.unwrap(), None);

        assert_eq!(repo.clear().await.unwrap(), 1);
        assert_eq!(repo.get("productsQuantity").await.unwrap(), None);
    }
}
