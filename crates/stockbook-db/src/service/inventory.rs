//! # Inventory Transaction Service
//!
//! Product CRUD with business-rule validation, and the sale-recording
//! workflow that decrements stock and writes the sale as one transaction.
//!
//! ## The Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_sale(product_id, qty)                        │
//! │                                                                         │
//! │  1. Fetch product ──────────────► NotFound if absent                   │
//! │  2. Early stock check ──────────► "Insufficient stock" if qty > stock  │
//! │     (best-effort UX rejection; not authoritative)                      │
//! │  3. Freeze money:                                                       │
//! │       total  = selling × qty                                           │
//! │       profit = (selling − purchase) × qty                              │
//! │  4. BEGIN                                                               │
//! │       UPDATE products SET quantity = quantity − qty                    │
//! │       WHERE id = ? AND quantity >= qty                                 │
//! │         │                                                               │
//! │         ├── 0 rows ──► ROLLBACK, "Insufficient stock"                  │
//! │         │   (a concurrent sale won the race)                           │
//! │         ▼                                                               │
//! │       INSERT INTO sales (...)                                          │
//! │     COMMIT                                                              │
//! │                                                                         │
//! │  The conditional UPDATE is the only serialization point: concurrent    │
//! │  submissions cannot oversell, with no in-process locking.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::pool::Database;
use stockbook_core::validation::{validate_prices, validate_product_name, validate_stock_quantity};
use stockbook_core::{Category, NewProduct, Product, ProductPatch, Sale};

/// Product CRUD and the sale transaction.
///
/// ## Usage
/// ```rust,ignore
/// let inventory = InventoryService::new(db.clone());
/// let product = inventory.create_product(fields).await?;
/// let sale = inventory.record_sale(&product.id, 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    /// Creates a new InventoryService over the given database.
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Lists all products, newest first.
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.db.products().list().await
    }

    /// Creates a product after validating the business rules.
    ///
    /// ## Rules
    /// - Both prices must be > 0 ("Prices must be greater than zero")
    /// - Name must be non-empty
    /// - Initial quantity must not be negative (zero is fine)
    /// - Category defaults to `other` when omitted
    pub async fn create_product(&self, fields: NewProduct) -> StoreResult<Product> {
        debug!(name = %fields.name, "create_product");

        validate_product_name(&fields.name)?;
        validate_prices(fields.purchase_price, fields.selling_price)?;
        validate_stock_quantity(fields.quantity)?;

        let product = self.db.products().insert(&fields).await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Applies a partial update.
    ///
    /// Price and name rules are re-checked against the patched values, so an
    /// update can never push a product into an invalid state.
    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        debug!(id = %id, "update_product");

        if patch.is_empty() {
            return Err(StoreError::Validation(
                stockbook_core::ValidationError::Required {
                    field: "fields".to_string(),
                },
            ));
        }

        if let Some(name) = &patch.name {
            validate_product_name(name)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_stock_quantity(quantity)?;
        }
        if patch.purchase_price.is_some() || patch.selling_price.is_some() {
            let current = self
                .db
                .products()
                .get_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found("Product", id))?;
            validate_prices(
                patch.purchase_price.unwrap_or(current.purchase_price),
                patch.selling_price.unwrap_or(current.selling_price),
            )?;
        }

        self.db.products().update(id, &patch).await
    }

    /// Deletes a product.
    ///
    /// No referential check against existing sales: their `product_id`
    /// dangles from here on (accepted behavior), and the report joins drop
    /// them silently.
    pub async fn delete_product(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "delete_product");
        self.db.products().delete(id).await?;
        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// The category labels to offer in the product form: the union of
    /// labels currently in use and the fixed default set, deduplicated,
    /// sorted.
    ///
    /// Raw in-use labels are kept as stored, so rows written by other tools
    /// still show up in the filter dropdown.
    pub async fn list_categories(&self) -> StoreResult<Vec<String>> {
        let mut labels: std::collections::BTreeSet<String> = Category::ALL
            .iter()
            .map(|c| c.label().to_string())
            .collect();

        for label in self.db.products().distinct_categories().await? {
            labels.insert(label);
        }

        Ok(labels.into_iter().collect())
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    /// Lists all sales, newest first.
    pub async fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        self.db.sales().list().await
    }

    /// Records a sale: freezes revenue/profit from the product's current
    /// prices, then decrements stock and inserts the sale in one SQL
    /// transaction.
    ///
    /// ## Errors
    /// * `NotFound` - no product with that id
    /// * `InsufficientStock` - `quantity` is not in `1..=product.quantity`,
    ///   either at the early check or at the authoritative conditional
    ///   decrement (a concurrent sale got there first)
    pub async fn record_sale(&self, product_id: &str, quantity: i64) -> StoreResult<Sale> {
        debug!(product_id = %product_id, quantity = %quantity, "record_sale");

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", product_id))?;

        // Early rejection for the common case; the conditional UPDATE below
        // re-checks under the transaction
        if !product.can_fulfill(quantity) {
            warn!(
                product_id = %product_id,
                requested = %quantity,
                on_hand = %product.quantity,
                "Sale rejected: insufficient stock"
            );
            return Err(StoreError::InsufficientStock);
        }

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            quantity,
            // Frozen at sale time; later price edits never touch these
            total_amount: product.selling_price.multiply_quantity(quantity),
            profit: product.unit_margin().multiply_quantity(quantity),
            sale_time: now,
            created_at: now,
        };

        let mut tx = self.db.pool().begin().await?;

        let reserved = self
            .db
            .products()
            .reserve_stock(&mut tx, product_id, quantity, now)
            .await?;
        if !reserved {
            tx.rollback()
                .await
                .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;
            warn!(product_id = %product_id, "Sale lost the stock race, rolled back");
            return Err(StoreError::InsufficientStock);
        }

        self.db.sales().insert(&mut tx, &sale).await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale.id,
            product_id = %product_id,
            quantity = %quantity,
            total = %sale.total_amount,
            "Sale recorded"
        );

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use stockbook_core::Money;

    async fn service() -> InventoryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        InventoryService::new(db)
    }

    fn oat_milk() -> NewProduct {
        NewProduct {
            name: "Oat Milk 1L".to_string(),
            quantity: 10,
            purchase_price: Money::from_cents(500),
            selling_price: Money::from_cents(800),
            category: Some(Category::Dairy),
        }
    }

    // -------------------------------------------------------------------------
    // create_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_product() {
        let svc = service().await;
        let product = svc.create_product(oat_milk()).await.unwrap();

        assert_eq!(product.quantity, 10);
        assert_eq!(product.selling_price, Money::from_cents(800));
    }

    #[tokio::test]
    async fn test_create_product_rejects_non_positive_prices() {
        let svc = service().await;

        let mut zero_purchase = oat_milk();
        zero_purchase.purchase_price = Money::zero();
        let err = svc.create_product(zero_purchase).await.unwrap_err();
        assert_eq!(err.to_string(), "Prices must be greater than zero");

        let mut negative_selling = oat_milk();
        negative_selling.selling_price = Money::from_cents(-100);
        assert!(svc.create_product(negative_selling).await.is_err());

        // Nothing was persisted
        assert!(svc.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_rejects_empty_name_and_negative_stock() {
        let svc = service().await;

        let mut unnamed = oat_milk();
        unnamed.name = "   ".to_string();
        assert!(svc.create_product(unnamed).await.is_err());

        let mut negative = oat_milk();
        negative.quantity = -1;
        assert!(svc.create_product(negative).await.is_err());
    }

    // -------------------------------------------------------------------------
    // update_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_product_revalidates_prices() {
        let svc = service().await;
        let product = svc.create_product(oat_milk()).await.unwrap();

        let patch = ProductPatch {
            selling_price: Some(Money::zero()),
            ..ProductPatch::default()
        };
        let err = svc.update_product(&product.id, patch).await.unwrap_err();
        assert_eq!(err.to_string(), "Prices must be greater than zero");

        // Valid price update passes, pairing with the stored purchase price
        let patch = ProductPatch {
            selling_price: Some(Money::from_cents(950)),
            ..ProductPatch::default()
        };
        let updated = svc.update_product(&product.id, patch).await.unwrap();
        assert_eq!(updated.selling_price, Money::from_cents(950));
    }

    #[tokio::test]
    async fn test_update_product_rejects_empty_patch() {
        let svc = service().await;
        let product = svc.create_product(oat_milk()).await.unwrap();

        assert!(svc
            .update_product(&product.id, ProductPatch::default())
            .await
            .is_err());
    }

    // -------------------------------------------------------------------------
    // record_sale
    // -------------------------------------------------------------------------

    /// Scenario: P1 (quantity 10, purchase $5.00, selling $8.00);
    /// record_sale(P1, 3) freezes total $24.00 / profit $9.00 and leaves 7.
    #[tokio::test]
    async fn test_record_sale_happy_path() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();

        let sale = svc.record_sale(&p1.id, 3).await.unwrap();

        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.total_amount, Money::from_cents(2400));
        assert_eq!(sale.profit, Money::from_cents(900));
        assert_eq!(sale.sale_time, sale.created_at);

        let after = svc.list_products().await.unwrap();
        assert_eq!(after[0].quantity, 7);
        assert_eq!(svc.list_sales().await.unwrap().len(), 1);
    }

    /// Scenario: record_sale(P1, 20) with 10 on hand fails with
    /// "Insufficient stock" and changes nothing.
    #[tokio::test]
    async fn test_record_sale_insufficient_stock() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();

        let err = svc.record_sale(&p1.id, 20).await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock");

        let after = svc.list_products().await.unwrap();
        assert_eq!(after[0].quantity, 10);
        assert!(svc.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_rejects_non_positive_quantity() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();

        assert!(svc.record_sale(&p1.id, 0).await.is_err());
        assert!(svc.record_sale(&p1.id, -2).await.is_err());
        assert_eq!(svc.list_products().await.unwrap()[0].quantity, 10);
    }

    #[tokio::test]
    async fn test_record_sale_missing_product() {
        let svc = service().await;

        let err = svc.record_sale("no-such-id", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    /// Draining stock exactly to zero is legal; one more unit is not.
    #[tokio::test]
    async fn test_record_sale_exact_stock_boundary() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();

        svc.record_sale(&p1.id, 10).await.unwrap();
        assert_eq!(svc.list_products().await.unwrap()[0].quantity, 0);

        let err = svc.record_sale(&p1.id, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock");
    }

    /// Frozen snapshot: a later price change must not rewrite an old sale.
    #[tokio::test]
    async fn test_sale_money_frozen_against_price_edits() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();
        let sale = svc.record_sale(&p1.id, 2).await.unwrap();

        let patch = ProductPatch {
            selling_price: Some(Money::from_cents(9900)),
            ..ProductPatch::default()
        };
        svc.update_product(&p1.id, patch).await.unwrap();

        let sales = svc.list_sales().await.unwrap();
        assert_eq!(sales[0].id, sale.id);
        assert_eq!(sales[0].total_amount, Money::from_cents(1600));
        assert_eq!(sales[0].profit, Money::from_cents(600));
    }

    /// Selling below cost produces a negative frozen profit.
    #[tokio::test]
    async fn test_record_sale_negative_margin() {
        let svc = service().await;
        let mut loss_leader = oat_milk();
        loss_leader.purchase_price = Money::from_cents(900);
        let p = svc.create_product(loss_leader).await.unwrap();

        let sale = svc.record_sale(&p.id, 2).await.unwrap();
        assert_eq!(sale.profit, Money::from_cents(-200));
    }

    // -------------------------------------------------------------------------
    // delete_product / list_categories
    // -------------------------------------------------------------------------

    /// Deleting a product leaves its sales dangling, by design.
    #[tokio::test]
    async fn test_delete_product_keeps_sales() {
        let svc = service().await;
        let p1 = svc.create_product(oat_milk()).await.unwrap();
        svc.record_sale(&p1.id, 3).await.unwrap();

        svc.delete_product(&p1.id).await.unwrap();

        assert!(svc.list_products().await.unwrap().is_empty());
        let sales = svc.list_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].product_id, p1.id);
    }

    #[tokio::test]
    async fn test_list_categories_is_union_with_defaults() {
        let svc = service().await;
        svc.create_product(oat_milk()).await.unwrap();

        let labels = svc.list_categories().await.unwrap();

        // All defaults present, deduplicated with the in-use "dairy", sorted
        assert_eq!(
            labels,
            vec![
                "beverages", "dairy", "frozen", "grocery", "household", "other", "snacks"
            ]
        );
    }
}
