//! # Seed Data Generator
//!
//! Populates the database with demo products, sales, and stock history for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! ## Generated Data
//! - A small catalog across categories (Electronics, Home Appliances, Grocery)
//! - Several sales per product, spread over the last 30 days
//! - A matching stock drawdown for every sale, routed through the
//!   stock-mutation operation so the audit trail stays consistent with the
//!   sales ledger

use chrono::{Duration, Utc};
use std::env;

use tally_core::{NewProduct, NewSale};
use tally_db::{Database, DbConfig};

/// Demo catalog: (name, category, price_cents, initial stock).
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("iPhone 14", "Electronics", 99999, 50),
    ("Samsung TV", "Electronics", 49999, 20),
    ("Wireless Mouse", "Electronics", 2499, 120),
    ("Blender", "Home Appliances", 5999, 100),
    ("Toaster", "Home Appliances", 3499, 60),
    ("Coffee Beans 1kg", "Grocery", 1899, 200),
    ("Olive Oil 500ml", "Grocery", 1299, 150),
];

/// Sales recorded per product.
const SALES_PER_PRODUCT: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tally_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut sales_recorded = 0;
    for (idx, &(name, category, price_cents, stock)) in PRODUCTS.iter().enumerate() {
        let product = db
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                price_cents,
                stock,
            })
            .await?;

        // Deterministic pseudo-random quantities and dates, varied per product
        let mut remaining = stock;
        for n in 0..SALES_PER_PRODUCT {
            let quantity = ((idx * 7 + n * 3) % 5 + 1) as i64;
            let days_ago = ((idx * 11 + n * 5) % 30) as i64;
            let sale_date = Utc::now() - Duration::days(days_ago);

            let sale = db
                .sales()
                .insert(&NewSale {
                    product_id: product.id,
                    quantity,
                    total_price_cents: price_cents * quantity,
                    sale_date: Some(sale_date),
                })
                .await?;
            sales_recorded += 1;

            // Keep the audit trail consistent with the sale we just recorded
            remaining -= quantity;
            db.inventory().update_stock(product.id, remaining).await?;

            println!(
                "  {} x{} ({}) sale #{}",
                name,
                quantity,
                sale.total_price(),
                sale.id
            );
        }
    }

    println!();
    println!(
        "✓ Seeded {} products, {} sales",
        PRODUCTS.len(),
        sales_recorded
    );

    // Quick sanity pass over the audit trail
    let low_stock = db.products().list(Some(10)).await?;
    println!("  Products at or under stock 10: {}", low_stock.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
