//! # Held Sale Repository
//!
//! Parked carts, stored as JSON payloads.
//!
//! ## Hold / Resume Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. HOLD                                                               │
//! │     └── insert() → row { id, line_count, grand_total_cents, payload }  │
//! │                                                                         │
//! │  2. LIST                                                               │
//! │     └── list() → summaries, oldest first (payload decoded)             │
//! │                                                                         │
//! │  3. RESUME                                                             │
//! │     └── take() → SELECT + DELETE in one transaction                    │
//! │         (a held sale is resumed at most once)                          │
//! │                                                                         │
//! │  4. DISCARD                                                            │
//! │     └── delete()                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tillpoint_core::{HeldSale, HeldSaleSummary};

const ENTITY: &str = "Held sale";

/// Repository for held sales.
#[derive(Debug, Clone)]
pub struct HeldSaleRepository {
    pool: SqlitePool,
}

impl HeldSaleRepository {
    /// Creates a new HeldSaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HeldSaleRepository { pool }
    }

    /// Stores a held sale.
    ///
    /// Fails with `UniqueViolation` if the id is already taken.
    pub async fn insert(&self, held: &HeldSale) -> DbResult<()> {
        debug!(id = %held.sale_id, lines = held.products.len(), "Inserting held sale");

        let payload = serde_json::to_string(held)?;

        sqlx::query(
            r#"
            INSERT INTO held_sales (id, line_count, grand_total_cents, payload, held_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&held.sale_id)
        .bind(held.products.len() as i64)
        .bind(held.totals.grand_total.cents())
        .bind(payload)
        .bind(held.held_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &held.sale_id),
            other => other,
        })?;

        Ok(())
    }

    /// Lists held sales, oldest first.
    pub async fn list(&self) -> DbResult<Vec<HeldSaleSummary>> {
        let rows = sqlx::query("SELECT payload FROM held_sales ORDER BY held_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| decode(row.try_get("payload")?).map(|held| held.summary()))
            .collect()
    }

    /// Gets a held sale by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<HeldSale>> {
        let row = sqlx::query("SELECT payload FROM held_sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| decode(row.try_get("payload")?)).transpose()
    }

    /// Removes and returns a held sale in one transaction.
    pub async fn take(&self, id: &str) -> DbResult<HeldSale> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT payload FROM held_sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;
        let held = decode(row.try_get("payload")?)?;

        sqlx::query("DELETE FROM held_sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id = %id, "Took held sale");
        Ok(held)
    }

    /// Discards a held sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM held_sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        debug!(id = %id, "Deleted held sale");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM held_sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn decode(payload: String) -> DbResult<HeldSale> {
    Ok(serde_json::from_str(&payload)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tillpoint_core::{Cart, Money, Product, SaleType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn held(ms: i64) -> HeldSale {
        let product = Product {
            id: "p-1".to_string(),
            name: "Rice".to_string(),
            item_code: Some("RICE".to_string()),
            barcode: None,
            sales_price: Money::from_cents(9000),
            wholesale_price: Money::from_cents(8500),
            mrp: Money::from_cents(10000),
            stock: Decimal::from(10),
            category: None,
        };
        let mut cart = Cart::new(SaleType::Retail);
        cart.add(&product, Decimal::from(2)).unwrap();
        HeldSale::hold(&cart, Utc.timestamp_millis_opt(ms).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = test_db().await;
        let repo = db.held_sales();

        repo.insert(&held(2_000)).await.unwrap();
        repo.insert(&held(1_000)).await.unwrap();

        let list = repo.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].sale_id, "BILL-1000");
        assert_eq!(list[0].grand_total.cents(), 18000);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = test_db().await;
        let repo = db.held_sales();

        repo.insert(&held(1_000)).await.unwrap();
        let err = repo.insert(&held(1_000)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "BILL-1000"));
    }

    #[tokio::test]
    async fn test_take_removes_row() {
        let db = test_db().await;
        let repo = db.held_sales();
        let original = held(1_000);
        repo.insert(&original).await.unwrap();

        let taken = repo.take("BILL-1000").await.unwrap();
        assert_eq!(taken, original);
        assert!(repo.get("BILL-1000").await.unwrap().is_none());
        assert!(matches!(
            repo.take("BILL-1000").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = test_db().await;
        let repo = db.held_sales();
        assert!(matches!(
            repo.delete("BILL-404").await,
            Err(DbError::NotFound { .. })
        ));

        repo.insert(&held(5)).await.unwrap();
        repo.delete("BILL-5").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
