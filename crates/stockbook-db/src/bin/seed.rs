//! # Seed Data Generator
//!
//! Populates a development database with products and back-dated sales so
//! the dashboard and report screens have something to show.
//!
//! ## Usage
//! ```bash
//! # Default: 24 products, 30 days of sales history
//! cargo run -p stockbook-db --bin seed
//!
//! # Custom amounts
//! cargo run -p stockbook-db --bin seed -- --count 40 --days 90
//!
//! # Specify database path (STOCKBOOK_DB_PATH also works)
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! - Products spread across the category set, prices derived
//!   deterministically from the item index (no RNG dependency)
//! - Sales back-dated over the requested window, written through the same
//!   conditional-decrement transaction the live sale workflow uses, so
//!   stock levels and sale history stay consistent

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use stockbook_core::{Category, Money, NewProduct, Sale};
use stockbook_db::{Database, DbConfig};

/// Product names per category for realistic test data.
const CATALOG: &[(Category, &[&str])] = &[
    (
        Category::Beverages,
        &[
            "Orange Juice 1L",
            "Sparkling Water 6-Pack",
            "Cold Brew Coffee",
            "Green Tea 20ct",
            "Lemonade 2L",
        ],
    ),
    (
        Category::Snacks,
        &[
            "Salted Pretzels",
            "Tortilla Chips",
            "Dark Chocolate Bar",
            "Trail Mix 500g",
            "Rice Crackers",
        ],
    ),
    (
        Category::Dairy,
        &[
            "Oat Milk 1L",
            "Whole Milk 1L",
            "Greek Yogurt 4-Pack",
            "Cheddar Block 400g",
            "Butter 250g",
        ],
    ),
    (
        Category::Frozen,
        &[
            "Vanilla Ice Cream",
            "Frozen Peas 1kg",
            "Margherita Pizza",
            "Fish Fillets 4ct",
            "Berry Mix 750g",
        ],
    ),
    (
        Category::Grocery,
        &[
            "Basmati Rice 5kg",
            "Spaghetti 500g",
            "Canned Tomatoes",
            "Olive Oil 750ml",
            "Honey 340g",
        ],
    ),
    (
        Category::Household,
        &[
            "Dish Soap",
            "Paper Towels 6-Roll",
            "Laundry Detergent",
            "Trash Bags 30ct",
            "Sponges 5-Pack",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 24;
    let mut days: i64 = 30;
    let mut db_path =
        env::var("STOCKBOOK_DB_PATH").unwrap_or_else(|_| "./stockbook_dev.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(24);
                    i += 1;
                }
            }
            "--days" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 24)");
                println!("      --days <N>     Days of sales history to back-fill (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockbook_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!("History:  {} days", days);
    println!();

    // Connect to database
    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut products = Vec::new();
    let mut index = 0usize;
    'outer: for (category, names) in CATALOG {
        for name in *names {
            if products.len() >= count {
                break 'outer;
            }

            let fields = generate_product(*category, name, index);
            let product = db.products().insert(&fields).await?;
            products.push(product);
            index += 1;
        }
    }

    println!("✓ Generated {} products", products.len());

    if products.is_empty() {
        println!();
        println!("✓ Seed complete!");
        return Ok(());
    }

    // Back-fill sales over the history window
    println!();
    println!("Back-filling sales...");

    let now = Utc::now();
    let mut recorded = 0usize;

    for day in 0..days {
        // 1-3 sales per day, spread over opening hours
        let per_day = 1 + (day as usize % 3);
        for slot in 0..per_day {
            let seed = day as usize * 7 + slot * 13;
            let product = &products[seed % products.len()];
            let quantity = 1 + (seed % 4) as i64;
            let hour = 9 + (seed % 11) as u32; // 09:00 - 19:00
            let at = now - Duration::days(day) - Duration::hours(24 - hour as i64);

            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                product_id: product.id.clone(),
                quantity,
                total_amount: product.selling_price.multiply_quantity(quantity),
                profit: product.unit_margin().multiply_quantity(quantity),
                sale_time: at,
                created_at: at,
            };

            // Same transaction shape as the live workflow: decrement + insert
            let mut tx = db.pool().begin().await?;
            let reserved = db
                .products()
                .reserve_stock(&mut tx, &product.id, quantity, at)
                .await?;
            if !reserved {
                tx.rollback().await?;
                continue; // This product ran dry; skip the slot
            }
            db.sales().insert(&mut tx, &sale).await?;
            tx.commit().await?;

            recorded += 1;
            if recorded % 25 == 0 {
                println!("  Recorded {} sales...", recorded);
            }
        }
    }

    println!("✓ Recorded {} sales", recorded);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Derives deterministic product fields from the item index.
fn generate_product(category: Category, name: &str, index: usize) -> NewProduct {
    // Purchase $1.50 - $13.50, selling at a 20-60% markup
    let purchase = 150 + ((index * 137) % 1200) as i64;
    let markup = 20 + (index * 7) % 40;
    let selling = purchase + purchase * markup as i64 / 100;

    NewProduct {
        name: name.to_string(),
        quantity: 40 + (index % 60) as i64,
        purchase_price: Money::from_cents(purchase),
        selling_price: Money::from_cents(selling),
        category: Some(category),
    }
}
