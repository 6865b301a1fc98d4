//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations (newest-first listing)
//! - The atomic conditional stock decrement ([`ProductRepository::reserve_stock`])
//! - Distinct in-use category labels
//!
//! ## The Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Decrement Strategy                             │
//! │                                                                         │
//! │  ❌ WRONG: read-check-write (races past the stock check)               │
//! │     let p = get(id);  if p.quantity >= q { set quantity = p.q - q }    │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional UPDATE                                    │
//! │     UPDATE products SET quantity = quantity - ?                        │
//! │     WHERE id = ? AND quantity >= ?                                     │
//! │                                                                         │
//! │  Zero rows affected = the stock check failed at the storage layer.     │
//! │  Two concurrent sales of the last unit: exactly one UPDATE matches.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use stockbook_core::{Category, Money, NewProduct, Product, ProductPatch};

// =============================================================================
// Row Type
// =============================================================================

/// Storage representation of a product (snake_case columns, raw integers).
///
/// The storage schema stays inside this crate: rows convert into the
/// domain [`Product`] before leaving the repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub purchase_price: i64,
    pub selling_price: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            purchase_price: Money::from_cents(row.purchase_price),
            selling_price: Money::from_cents(row.selling_price),
            // Lenient parse: rows written by other tools stay readable
            category: Category::from_label(&row.category),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let products = repo.list().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id, name, quantity, purchase_price, selling_price,
                category, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                id, name, quantity, purchase_price, selling_price,
                category, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts a new product.
    ///
    /// The repository assigns the id (UUID v4) and both timestamps.
    /// Input validation happens in the service layer before this is called.
    pub async fn insert(&self, fields: &NewProduct) -> StoreResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: fields.name.trim().to_string(),
            quantity: fields.quantity,
            purchase_price: fields.purchase_price,
            selling_price: fields.selling_price,
            category: fields.category.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, quantity, purchase_price, selling_price,
                category, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.purchase_price.cents())
        .bind(product.selling_price.cents())
        .bind(product.category.label())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product after the update
    /// * `Err(StoreError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> StoreResult<Product> {
        debug!(id = %id, "Updating product");

        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        if let Some(name) = &patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(purchase_price) = patch.purchase_price {
            product.purchase_price = purchase_price;
        }
        if let Some(selling_price) = patch.selling_price {
            product.selling_price = selling_price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        product.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                quantity = ?3,
                purchase_price = ?4,
                selling_price = ?5,
                category = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.purchase_price.cents())
        .bind(product.selling_price.cents())
        .bind(product.category.label())
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(product)
    }

    /// Hard-deletes a product.
    ///
    /// Sales referencing this product keep their now-dangling `product_id`
    /// (weak reference, accepted behavior). Aggregations drop them on join.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }

    /// Atomically decrements stock if enough is on hand.
    ///
    /// Runs on a caller-supplied transaction connection so the decrement and
    /// the sale insert commit (or roll back) together.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock reserved; `quantity` decremented by `qty`
    /// * `Ok(false)` - Not enough stock (or product gone); nothing changed
    pub async fn reserve_stock(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        qty: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        debug!(id = %id, qty = %qty, "Reserving stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(qty)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Returns the raw category labels currently in use, sorted.
    pub async fn distinct_categories(&self) -> StoreResult<Vec<String>> {
        let labels: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(labels)
    }

    /// Counts total products (for diagnostics and the seed tool).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
    use crate::pool::{Database, DbConfig};
    use stockbook_core::{Category, Money, NewProduct, ProductPatch};

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            quantity: 10,
            purchase_price: Money::from_cents(500),
            selling_price: Money::from_cents(800),
            category: Some(Category::Dairy),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&new_product("Oat Milk 1L")).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Oat Milk 1L");
        assert_eq!(fetched.quantity, 10);
        assert_eq!(fetched.purchase_price, Money::from_cents(500));
        assert_eq!(fetched.category, Category::Dairy);
    }

    #[tokio::test]
    async fn test_category_defaults_to_other() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut fields = new_product("Mystery Item");
        fields.category = None;
        let created = repo.insert(&fields).await.unwrap();

        assert_eq!(created.category, Category::Other);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let first = repo.insert(&new_product("First")).await.unwrap();
        // Created-at has sub-second precision; force distinct instants
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.insert(&new_product("Second")).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_partial_update_refreshes_updated_at() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&new_product("Oat Milk 1L")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let patch = ProductPatch {
            selling_price: Some(Money::from_cents(950)),
            ..ProductPatch::default()
        };
        let updated = repo.update(&created.id, &patch).await.unwrap();

        assert_eq!(updated.selling_price, Money::from_cents(950));
        // Untouched fields survive
        assert_eq!(updated.name, "Oat Milk 1L");
        assert_eq!(updated.purchase_price, Money::from_cents(500));
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let err = repo
            .update("no-such-id", &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&new_product("Short-lived")).await.unwrap();
        repo.delete(&created.id).await.unwrap();

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(repo.delete(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_reserve_stock_conditional() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let created = repo.insert(&new_product("Oat Milk 1L")).await.unwrap();

        // Within stock: succeeds and decrements
        let mut tx = db.pool().begin().await.unwrap();
        let ok = repo
            .reserve_stock(&mut tx, &created.id, 3, chrono::Utc::now())
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(ok);
        assert_eq!(repo.get_by_id(&created.id).await.unwrap().unwrap().quantity, 7);

        // Beyond stock: zero rows match, quantity untouched
        let mut tx = db.pool().begin().await.unwrap();
        let ok = repo
            .reserve_stock(&mut tx, &created.id, 20, chrono::Utc::now())
            .await
            .unwrap();
        tx.rollback().await.unwrap();
        assert!(!ok);
        assert_eq!(repo.get_by_id(&created.id).await.unwrap().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_distinct_categories() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut snacks = new_product("Pretzels");
        snacks.category = Some(Category::Snacks);
        repo.insert(&snacks).await.unwrap();
        repo.insert(&new_product("Oat Milk 1L")).await.unwrap();
        repo.insert(&new_product("Cheddar")).await.unwrap();

        let labels = repo.distinct_categories().await.unwrap();
        assert_eq!(labels, vec!["dairy".to_string(), "snacks".to_string()]);
    }
}
