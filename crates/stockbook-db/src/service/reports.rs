//! # Report Service
//!
//! The gateway side of the reporting screens: fetch the product/sale
//! snapshots, optionally apply the lookback window, then evaluate the pure
//! aggregation engine from stockbook-core.
//!
//! ## Fetch → Filter → Aggregate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  dashboard / reports screen                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReportService (THIS MODULE)                                            │
//! │       │  fetch products + sales (repositories)                          │
//! │       │  filter_sales_window(window, Local::now())  ← caller-side       │
//! │       ▼                                                                 │
//! │  stockbook_core::report::*  ← pure math, Local::now() passed in         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plain data structures, serialized straight to the dashboard            │
//! │                                                                         │
//! │  The local timezone enters exactly here; the engine itself never        │
//! │  reads a clock.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Local;
use tracing::debug;

use crate::error::StoreResult;
use crate::pool::Database;
use stockbook_core::report::{
    self, filter_sales_window, CategorySales, DailySalesSummary, DashboardStats, HourlySalesSlot,
    SalesWindow, TopProduct, DEFAULT_TOP_PRODUCTS_LIMIT,
};
use stockbook_core::Sale;

/// Fetch-then-aggregate report operations.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new ReportService over the given database.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// The dashboard's headline numbers, with the today-split evaluated
    /// against the local calendar date.
    pub async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let products = self.db.products().list().await?;
        let sales = self.db.sales().list().await?;

        debug!(
            products = products.len(),
            sales = sales.len(),
            "Computing dashboard stats"
        );

        Ok(report::dashboard_stats(&products, &sales, Local::now()))
    }

    /// Per-day summaries, newest day first, optionally windowed.
    pub async fn daily_sales(
        &self,
        window: Option<SalesWindow>,
    ) -> StoreResult<Vec<DailySalesSummary>> {
        let sales = self.windowed_sales(window).await?;
        Ok(report::daily_sales(&sales, &Local))
    }

    /// The 24 hour-of-day buckets, optionally windowed.
    pub async fn hourly_sales(
        &self,
        window: Option<SalesWindow>,
    ) -> StoreResult<Vec<HourlySalesSlot>> {
        let sales = self.windowed_sales(window).await?;
        Ok(report::hourly_sales(&sales, &Local))
    }

    /// Top sellers by revenue, optionally windowed.
    pub async fn top_products(
        &self,
        window: Option<SalesWindow>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<TopProduct>> {
        let products = self.db.products().list().await?;
        let sales = self.windowed_sales(window).await?;

        Ok(report::top_selling_products(
            &products,
            &sales,
            limit.unwrap_or(DEFAULT_TOP_PRODUCTS_LIMIT),
        ))
    }

    /// Revenue distribution per category, optionally windowed.
    pub async fn category_sales(
        &self,
        window: Option<SalesWindow>,
    ) -> StoreResult<Vec<CategorySales>> {
        let products = self.db.products().list().await?;
        let sales = self.windowed_sales(window).await?;

        Ok(report::category_sales(&products, &sales))
    }

    /// Fetches sales and applies the lookback window, when one is set.
    async fn windowed_sales(&self, window: Option<SalesWindow>) -> StoreResult<Vec<Sale>> {
        let sales = self.db.sales().list().await?;
        Ok(match window {
            Some(window) => filter_sales_window(&sales, window, Local::now()),
            None => sales,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::service::InventoryService;
    use stockbook_core::{Category, Money, NewProduct};

    async fn fixtures() -> (InventoryService, ReportService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (InventoryService::new(db.clone()), ReportService::new(db))
    }

    fn product(name: &str, category: Category) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            quantity: 50,
            purchase_price: Money::from_cents(500),
            selling_price: Money::from_cents(800),
            category: Some(category),
        }
    }

    #[tokio::test]
    async fn test_empty_database_yields_zero_stats() {
        let (_, reports) = fixtures().await;

        let stats = reports.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_sales, Money::zero());

        assert!(reports.daily_sales(None).await.unwrap().is_empty());
        assert_eq!(reports.hourly_sales(None).await.unwrap().len(), 24);
        assert!(reports.top_products(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_stats_after_sales() {
        let (inventory, reports) = fixtures().await;
        let p = inventory
            .create_product(product("Oat Milk 1L", Category::Dairy))
            .await
            .unwrap();

        inventory.record_sale(&p.id, 3).await.unwrap();
        inventory.record_sale(&p.id, 1).await.unwrap();

        let stats = reports.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_products, 1);
        // 46 left × 500 purchase
        assert_eq!(stats.total_inventory_value, Money::from_cents(23000));
        assert_eq!(stats.total_sales, Money::from_cents(3200));
        assert_eq!(stats.total_profit, Money::from_cents(1200));
        // Both sales just happened, so the today-split includes them
        assert_eq!(stats.today_count, 2);
        assert_eq!(stats.categories_count[&Category::Dairy], 1);
    }

    #[tokio::test]
    async fn test_daily_sales_merges_todays_sales() {
        let (inventory, reports) = fixtures().await;
        let p = inventory
            .create_product(product("Oat Milk 1L", Category::Dairy))
            .await
            .unwrap();

        inventory.record_sale(&p.id, 2).await.unwrap();
        inventory.record_sale(&p.id, 1).await.unwrap();

        let days = reports.daily_sales(None).await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].count, 2);
        assert_eq!(days[0].total, Money::from_cents(2400));
    }

    #[tokio::test]
    async fn test_top_products_drops_orphaned_sales() {
        let (inventory, reports) = fixtures().await;
        let keep = inventory
            .create_product(product("Oat Milk 1L", Category::Dairy))
            .await
            .unwrap();
        let gone = inventory
            .create_product(product("Dish Soap", Category::Household))
            .await
            .unwrap();

        inventory.record_sale(&keep.id, 1).await.unwrap();
        inventory.record_sale(&gone.id, 40).await.unwrap();
        inventory.delete_product(&gone.id).await.unwrap();

        let top = reports.top_products(None, None).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, keep.id);
    }

    #[tokio::test]
    async fn test_windowed_reports_keep_fresh_sales() {
        let (inventory, reports) = fixtures().await;
        let p = inventory
            .create_product(product("Oat Milk 1L", Category::Dairy))
            .await
            .unwrap();
        inventory.record_sale(&p.id, 2).await.unwrap();

        // A sale recorded just now sits inside every window
        for window in [SalesWindow::Week, SalesWindow::Month, SalesWindow::Quarter] {
            let days = reports.daily_sales(Some(window)).await.unwrap();
            assert_eq!(days.len(), 1);
        }
    }
}
