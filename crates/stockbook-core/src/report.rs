//! # Report Module
//!
//! The aggregation engine: dashboard statistics, daily and hourly sales
//! breakdowns, top sellers, and category distributions.
//!
//! ## Purity Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Engine                                  │
//! │                                                                         │
//! │  Inputs:  &[Product], &[Sale]  (already fetched by the gateway)        │
//! │           now / tz             (explicit parameters, never Clock::now) │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ dashboard_stats  │  │   daily_sales    │  │    hourly_sales      │  │
//! │  │ totals + today   │  │ per-calendar-day │  │ 24 fixed hour slots  │  │
//! │  │ split + category │  │ desc by date     │  │ zeros included       │  │
//! │  │ histogram        │  └──────────────────┘  └──────────────────────┘  │
//! │  └──────────────────┘                                                  │
//! │  ┌──────────────────────┐  ┌──────────────────┐  ┌────────────────┐   │
//! │  │ top_selling_products │  │  category_sales  │  │ profit_margin  │   │
//! │  │ desc revenue, joins  │  │ revenue/category │  │ 0 when no      │   │
//! │  │ drop orphaned sales  │  │ drop orphans     │  │ sales (no NaN) │   │
//! │  └──────────────────────┘  └──────────────────┘  └────────────────┘   │
//! │                                                                         │
//! │  Outputs: plain data structures, serialized straight to the dashboard  │
//! │                                                                         │
//! │  NO I/O • NO CLOCK READS • SAME INPUT = SAME OUTPUT                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timezone Handling
//! Calendar-day grouping ("today", daily buckets) depends on the evaluating
//! timezone. Rather than baking `Local` in (untestable), every function that
//! groups by day or hour takes the timezone - or a full `now` instant -
//! as a parameter. The gateway passes `chrono::Local`; tests pass fixed
//! `Utc` or `FixedOffset` instants.
//!
//! ## Orphaned Sales
//! Products can be deleted while their sales remain (weak reference).
//! Aggregations that join sales to products (`top_selling_products`,
//! `category_sales`) silently drop sales whose product no longer exists.
//! Pure money totals (`dashboard_stats`, `daily_sales`, `hourly_sales`)
//! still count them - the revenue was real.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Category, Product, Sale};

/// How many products `top_selling_products` returns by default.
pub const DEFAULT_TOP_PRODUCTS_LIMIT: usize = 5;

// =============================================================================
// Derived Shapes (not persisted)
// =============================================================================

/// Aggregate totals over all products/sales, split by "today".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of distinct products in inventory.
    pub total_products: u32,
    /// Σ purchase_price × quantity over all products (capital on the shelf).
    pub total_inventory_value: Money,
    /// Σ total_amount over all sales, all time.
    pub total_sales: Money,
    /// Σ profit over all sales, all time.
    pub total_profit: Money,
    /// Σ total_amount over sales created today (evaluating timezone).
    pub today_sales: Money,
    /// Σ profit over sales created today.
    pub today_profit: Money,
    /// Number of sales created today.
    pub today_count: u32,
    /// Products per category.
    pub categories_count: BTreeMap<Category, u32>,
}

/// Per-calendar-day aggregation of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesSummary {
    /// ISO calendar date (`YYYY-MM-DD`) in the evaluating timezone.
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Σ total_amount for the day.
    pub total: Money,
    /// Σ profit for the day.
    pub profit: Money,
    /// Number of sales that day.
    pub count: u32,
}

/// One of the 24 fixed hour-of-day buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HourlySalesSlot {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Σ total_amount of sales whose sale_time falls in this hour.
    pub sales: Money,
    /// Number of such sales.
    pub count: u32,
}

/// A product's standing in the top-sellers ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub category: Category,
    /// Σ quantity across this product's sales.
    pub units_sold: i64,
    /// Σ total_amount across this product's sales. The ranking key.
    pub revenue: Money,
}

/// Revenue distribution across product categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: Category,
    /// Σ total_amount of sales whose product carries this category.
    pub revenue: Money,
    /// Number of such sales.
    pub count: u32,
}

// =============================================================================
// Date-Range Windows
// =============================================================================

/// The report screens' 7/30/90-day lookback windows.
///
/// Window filtering is applied by the caller BEFORE the aggregations run:
/// fetch, filter, then aggregate. The predicate is
/// `created_at >= now − N days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SalesWindow {
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    /// Last 90 days.
    Quarter,
}

impl SalesWindow {
    /// Length of the window in days.
    pub const fn days(self) -> i64 {
        match self {
            SalesWindow::Week => 7,
            SalesWindow::Month => 30,
            SalesWindow::Quarter => 90,
        }
    }

    /// The oldest instant still inside the window, as UTC.
    pub fn cutoff<Tz: TimeZone>(self, now: DateTime<Tz>) -> DateTime<Utc> {
        (now - Duration::days(self.days())).with_timezone(&Utc)
    }
}

/// Keeps only the sales inside `window`, preserving input order.
pub fn filter_sales_window<Tz: TimeZone>(
    sales: &[Sale],
    window: SalesWindow,
    now: DateTime<Tz>,
) -> Vec<Sale> {
    let cutoff = window.cutoff(now);
    sales
        .iter()
        .filter(|sale| sale.created_at >= cutoff)
        .cloned()
        .collect()
}

// =============================================================================
// Aggregations
// =============================================================================

/// Computes the dashboard's headline numbers.
///
/// - `total_products` = number of products
/// - `total_inventory_value` = Σ purchase_price × quantity
/// - `total_sales` / `total_profit` = Σ over ALL sales
/// - `today_*` = the subset of sales whose creation instant, viewed in
///   `now`'s timezone, falls on `now`'s calendar date
/// - `categories_count` = product histogram by category
///
/// Empty inputs produce all-zero stats, never an error.
pub fn dashboard_stats<Tz: TimeZone>(
    products: &[Product],
    sales: &[Sale],
    now: DateTime<Tz>,
) -> DashboardStats {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut stats = DashboardStats {
        total_products: products.len() as u32,
        ..DashboardStats::default()
    };

    for product in products {
        stats.total_inventory_value += product.inventory_value();
        *stats.categories_count.entry(product.category).or_insert(0) += 1;
    }

    for sale in sales {
        stats.total_sales += sale.total_amount;
        stats.total_profit += sale.profit;

        if sale.created_at.with_timezone(&tz).date_naive() == today {
            stats.today_sales += sale.total_amount;
            stats.today_profit += sale.profit;
            stats.today_count += 1;
        }
    }

    stats
}

/// Groups sales into per-calendar-day summaries, newest day first.
///
/// The day key is the sale's `created_at` rendered as a calendar date in
/// `tz`. Two sales at different times on the same date merge into one
/// summary with summed total/profit and `count = 2`.
pub fn daily_sales<Tz: TimeZone>(sales: &[Sale], tz: &Tz) -> Vec<DailySalesSummary> {
    let mut days: BTreeMap<NaiveDate, DailySalesSummary> = BTreeMap::new();

    for sale in sales {
        let date = sale.created_at.with_timezone(tz).date_naive();
        let entry = days.entry(date).or_insert_with(|| DailySalesSummary {
            date,
            total: Money::zero(),
            profit: Money::zero(),
            count: 0,
        });
        entry.total += sale.total_amount;
        entry.profit += sale.profit;
        entry.count += 1;
    }

    // BTreeMap iterates ascending; the dashboard wants newest first
    days.into_values().rev().collect()
}

/// Buckets sales into 24 fixed hour-of-day slots by `sale_time`.
///
/// All 24 slots are always present in the output; hours with no sales stay
/// at zero. The dashboard's hourly chart renders the slice as-is.
pub fn hourly_sales<Tz: TimeZone>(sales: &[Sale], tz: &Tz) -> Vec<HourlySalesSlot> {
    let mut slots: Vec<HourlySalesSlot> = (0..24)
        .map(|hour| HourlySalesSlot {
            hour,
            sales: Money::zero(),
            count: 0,
        })
        .collect();

    for sale in sales {
        let hour = sale.sale_time.with_timezone(tz).hour() as usize;
        slots[hour].sales += sale.total_amount;
        slots[hour].count += 1;
    }

    slots
}

/// Ranks products by revenue, descending, truncated to `limit`.
///
/// Sales are grouped by `product_id` and joined with the product list for
/// name/category; sales referencing a deleted product have no join partner
/// and are silently excluded. Ties break alphabetically by name so the
/// ranking is deterministic.
pub fn top_selling_products(products: &[Product], sales: &[Sale], limit: usize) -> Vec<TopProduct> {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut totals: HashMap<&str, (i64, Money)> = HashMap::new();
    for sale in sales {
        if by_id.contains_key(sale.product_id.as_str()) {
            let entry = totals
                .entry(sale.product_id.as_str())
                .or_insert((0, Money::zero()));
            entry.0 += sale.quantity;
            entry.1 += sale.total_amount;
        }
    }

    let mut ranked: Vec<TopProduct> = totals
        .into_iter()
        .map(|(id, (units_sold, revenue))| {
            let product = by_id[id];
            TopProduct {
                product_id: id.to_string(),
                name: product.name.clone(),
                category: product.category,
                units_sold,
                revenue,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

/// Revenue and sale count per product category, descending by revenue.
///
/// Same join rule as [`top_selling_products`]: orphaned sales are excluded.
pub fn category_sales(products: &[Product], sales: &[Sale]) -> Vec<CategorySales> {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut totals: BTreeMap<Category, CategorySales> = BTreeMap::new();
    for sale in sales {
        if let Some(product) = by_id.get(sale.product_id.as_str()) {
            let entry = totals
                .entry(product.category)
                .or_insert_with(|| CategorySales {
                    category: product.category,
                    revenue: Money::zero(),
                    count: 0,
                });
            entry.revenue += sale.total_amount;
            entry.count += 1;
        }
    }

    let mut out: Vec<CategorySales> = totals.into_values().collect();
    out.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    out
}

/// Profit as a percentage of revenue.
///
/// Defined as 0.0 when there is no revenue - never NaN or infinity. This is
/// the one place a float appears: the margin is a display ratio, not a
/// stored amount.
pub fn profit_margin(total_profit: Money, total_sales: Money) -> f64 {
    if total_sales.is_zero() {
        return 0.0;
    }

    total_profit.cents() as f64 / total_sales.cents() as f64 * 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
