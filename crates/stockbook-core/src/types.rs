//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Profile      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (account)   │       │
//! │  │  name           │   │  product_id     │   │  username       │       │
//! │  │  quantity       │   │  quantity       │   │  full_name      │       │
//! │  │  prices (cents) │   │  total/profit   │   │  phone_number   │       │
//! │  │  category       │   │  (frozen)       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │   NewProduct    │   │  ProductPatch   │       │
//! │  │  ─────────────  │   │  (create form)  │   │ (partial update)│       │
//! │  │  Beverages ...  │   └─────────────────┘   └─────────────────┘       │
//! │  │  Other (default)│                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Representation
//! Every serializable type here renames to camelCase: the dashboard frontend
//! consumes these shapes directly (`purchasePrice`, `totalAmount`, ...).
//! Storage uses snake_case columns; that translation lives entirely in the
//! persistence layer, never here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Product category tag.
///
/// A fixed enumerated set; anything a storage row carries outside this set
/// collapses to [`Category::Other`] on read. Variants are declared in
/// alphabetical label order so the derived `Ord` sorts the way category
/// lists are displayed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beverages,
    Dairy,
    Frozen,
    Grocery,
    Household,
    Other,
    Snacks,
}

impl Category {
    /// Every category, in sorted label order.
    pub const ALL: [Category; 7] = [
        Category::Beverages,
        Category::Dairy,
        Category::Frozen,
        Category::Grocery,
        Category::Household,
        Category::Other,
        Category::Snacks,
    ];

    /// The stable lowercase label used in storage and on the wire.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Beverages => "beverages",
            Category::Dairy => "dairy",
            Category::Frozen => "frozen",
            Category::Grocery => "grocery",
            Category::Household => "household",
            Category::Other => "other",
            Category::Snacks => "snacks",
        }
    }

    /// Lenient parse: case-insensitive label match, unknown labels map to
    /// [`Category::Other`]. Storage rows written by other tools stay
    /// readable.
    pub fn from_label(label: &str) -> Category {
        match label.trim().to_ascii_lowercase().as_str() {
            "beverages" => Category::Beverages,
            "dairy" => Category::Dairy,
            "frozen" => Category::Frozen,
            "grocery" => Category::Grocery,
            "household" => Category::Household,
            "snacks" => Category::Snacks,
            _ => Category::Other,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked item with purchase/selling price and on-hand quantity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4), assigned at creation.
    pub id: String,

    /// Display name. Never empty.
    pub name: String,

    /// On-hand stock. Never negative; mutated only by the sale workflow
    /// and explicit updates.
    pub quantity: i64,

    /// Acquisition cost per unit, in cents. Always > 0.
    pub purchase_price: Money,

    /// Sticker price per unit, in cents. Always > 0. May be below the
    /// purchase price (negative margin is allowed).
    pub selling_price: Money,

    /// Category tag, defaults to `other`.
    pub category: Category,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last mutated (including stock decrements).
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Capital tied up in this product: purchase price × on-hand quantity.
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.purchase_price.multiply_quantity(self.quantity)
    }

    /// Margin earned per unit sold. Negative when selling below cost.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.selling_price - self.purchase_price
    }

    /// Whether a sale of `qty` units can be fulfilled from current stock.
    ///
    /// Requires `qty > 0` and `qty <= quantity`. This is the early check;
    /// the storage layer re-verifies atomically at decrement time.
    #[inline]
    pub fn can_fulfill(&self, qty: i64) -> bool {
        qty > 0 && qty <= self.quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of a quantity of a Product sold.
///
/// Uses the snapshot pattern: `total_amount` and `profit` are computed from
/// the product's prices at sale time and never recalculated, so later price
/// edits don't rewrite history. `product_id` is a weak reference - the sale
/// outlives product deletion.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    /// Units sold. Always > 0 and, at creation time, ≤ the product's stock.
    pub quantity: i64,
    /// quantity × selling price at sale time (frozen).
    pub total_amount: Money,
    /// quantity × (selling − purchase) at sale time (frozen).
    pub profit: Money,
    /// When the sale happened. Buckets the hourly report.
    #[ts(as = "String")]
    pub sale_time: DateTime<Utc>,
    /// When the record was written. Buckets the daily report.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Profile
// =============================================================================

/// A user's public profile. `id` equals the identity-provider account id.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    /// Human-chosen handle, unique across all profiles.
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Input Shapes
// =============================================================================

/// Fields for creating a product. The gateway assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub purchase_price: Money,
    pub selling_price: Money,
    /// Defaults to [`Category::Other`] when omitted.
    pub category: Option<Category>,
}

/// Partial product update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub purchase_price: Option<Money>,
    pub selling_price: Option<Money>,
    pub category: Option<Category>,
}

impl ProductPatch {
    /// True when no field is set; the gateway rejects empty patches early.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.purchase_price.is_none()
            && self.selling_price.is_none()
            && self.category.is_none()
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        Product {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name: "Oat Milk 1L".to_string(),
            quantity: 10,
            purchase_price: Money::from_cents(500),
            selling_price: Money::from_cents(800),
            category: Category::Dairy,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("dairy"), Category::Dairy);
        assert_eq!(Category::from_label("  Beverages "), Category::Beverages);
        assert_eq!(Category::from_label("SNACKS"), Category::Snacks);
        // Unknown labels collapse to Other instead of failing
        assert_eq!(Category::from_label("electronics"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_category_default_and_order() {
        assert_eq!(Category::default(), Category::Other);

        // ALL is sorted by label; derived Ord agrees with label order
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_inventory_value() {
        let product = sample_product();
        // 10 units at $5.00 purchase = $50.00 tied up
        assert_eq!(product.inventory_value(), Money::from_cents(5000));
    }

    #[test]
    fn test_unit_margin() {
        let product = sample_product();
        assert_eq!(product.unit_margin(), Money::from_cents(300));
    }

    #[test]
    fn test_can_fulfill_bounds() {
        let product = sample_product();
        assert!(product.can_fulfill(1));
        assert!(product.can_fulfill(10));
        assert!(!product.can_fulfill(11));
        assert!(!product.can_fulfill(0));
        assert!(!product.can_fulfill(-3));
    }

    /// Wire contract: camelCase keys, prices as bare cent integers.
    #[test]
    fn test_product_wire_shape() {
        let product = sample_product();
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["purchasePrice"], 500);
        assert_eq!(json["sellingPrice"], 800);
        assert_eq!(json["category"], "dairy");
        assert!(json.get("purchase_price").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_sale_wire_shape() {
        let sale = Sale {
            id: "s1".to_string(),
            product_id: "p1".to_string(),
            quantity: 3,
            total_amount: Money::from_cents(2400),
            profit: Money::from_cents(900),
            sale_time: Utc.with_ymd_and_hms(2024, 3, 2, 14, 30, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 2, 14, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(&sale).unwrap();

        assert_eq!(json["productId"], "p1");
        assert_eq!(json["totalAmount"], 2400);
        assert_eq!(json["profit"], 900);
        assert!(json.get("saleTime").is_some());
    }

    #[test]
    fn test_product_patch_deserializes_partial() {
        let patch: ProductPatch = serde_json::from_str(r#"{"sellingPrice": 950}"#).unwrap();
        assert_eq!(patch.selling_price, Some(Money::from_cents(950)));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());

        let empty: ProductPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
