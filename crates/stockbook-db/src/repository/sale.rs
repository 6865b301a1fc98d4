//! # Sale Repository
//!
//! Database operations for sale records.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (the only write, inside the sale transaction)               │
//! │     └── insert(tx, &sale) - alongside the conditional stock decrement  │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list() - newest-first, feeds the aggregation engine            │
//! │                                                                         │
//! │  There is no update or delete: sales are immutable history.            │
//! │  total_amount and profit were frozen from the product's prices at      │
//! │  sale time and are never recomputed.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::StoreResult;
use stockbook_core::{Money, Sale};

// =============================================================================
// Row Type
// =============================================================================

/// Storage representation of a sale (snake_case columns, raw cents).
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct SaleRow {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub total_amount: i64,
    pub profit: i64,
    pub sale_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            total_amount: Money::from_cents(row.total_amount),
            profit: Money::from_cents(row.profit),
            sale_time: row.sale_time,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT
                id, product_id, quantity, total_amount, profit,
                sale_time, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales");
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Inserts a sale on a caller-supplied transaction connection.
    ///
    /// Always runs inside the sale transaction, after the stock decrement
    /// succeeded - both writes commit or roll back together.
    pub async fn insert(&self, conn: &mut SqliteConnection, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, quantity, total_amount, profit,
                sale_time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(sale.quantity)
        .bind(sale.total_amount.cents())
        .bind(sale.profit.cents())
        .bind(sale.sale_time)
        .bind(sale.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Counts total sales (for diagnostics and the seed tool).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockbook_core::{Money, Sale};

    use crate::pool::{Database, DbConfig};

    fn sale(id: &str, product_id: &str) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.to_string(),
            product_id: product_id.to_string(),
            quantity: 3,
            total_amount: Money::from_cents(2400),
            profit: Money::from_cents(900),
            sale_time: now,
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let mut tx = db.pool().begin().await.unwrap();
        repo.insert(&mut tx, &sale("s1", "p1")).await.unwrap();
        tx.commit().await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "s1");
        assert_eq!(listed[0].total_amount, Money::from_cents(2400));
        assert_eq!(listed[0].profit, Money::from_cents(900));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_insert() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let mut tx = db.pool().begin().await.unwrap();
        repo.insert(&mut tx, &sale("s1", "p1")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(repo.list().await.unwrap().is_empty());
    }

    /// A sale whose product was deleted still lists: weak reference.
    #[tokio::test]
    async fn test_sale_survives_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let mut tx = db.pool().begin().await.unwrap();
        repo.insert(&mut tx, &sale("s1", "never-existed")).await.unwrap();
        tx.commit().await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].product_id, "never-existed");
    }
}
