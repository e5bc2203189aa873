//! # Seed Data Generator
//!
//! Populates the database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./storefront_dev.db (default)
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```
//!
//! ## Generated Catalog
//! - Five currencies: `$`, `£`, `A$`, `¥`, `₽`
//! - Clothes with size and color attribute groups, priced in every currency
//! - Tech products, one of them carrying only a single `price`

use std::env;
use storefront_core::{AttributeGroup, Currency, PriceEntry, Product};
use storefront_db::{Database, DbConfig};
use tracing::{info, warn};

/// Currencies as `(label, symbol, rate against USD)`.
const CURRENCIES: &[(&str, &str, f64)] = &[
    ("USD", "$", 1.0),
    ("GBP", "£", 0.79),
    ("AUD", "A$", 1.52),
    ("JPY", "¥", 149.3),
    ("RUB", "₽", 92.5),
];

/// Demo products as `(id, name, brand, category, usd_price)`.
const PRODUCTS: &[(&str, &str, &str, &str, f64)] = &[
    ("huarache-x-stussy-le", "Nike Air Huarache Le", "Nike x Stussy", "clothes", 144.69),
    ("jacket-canada-goosee", "Jacket", "Canada Goose", "clothes", 518.47),
    ("ps-5", "PlayStation 5", "Sony", "tech", 844.02),
    ("xbox-series-s", "Xbox Series S 512GB", "Microsoft", "tech", 333.99),
    ("apple-imac-2021", "iMac 2021", "Apple", "tech", 1688.03),
    ("apple-airpods-pro", "AirPods Pro", "Apple", "tech", 300.23),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./storefront_dev.db");

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
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./storefront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding storefront database");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let catalog = db.catalog();

    let existing = catalog.count_products().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    for (position, (label, symbol, _)) in CURRENCIES.iter().enumerate() {
        catalog
            .upsert_currency(&Currency::new(*label, *symbol), position as i64)
            .await?;
    }

    let mut generated = 0;
    for (position, entry) in PRODUCTS.iter().enumerate() {
        let product = generate_product(entry);
        if let Err(e) = catalog.upsert_product(&product, position as i64).await {
            warn!(product_id = %product.id, error = %e, "Failed to insert product");
            continue;
        }
        generated += 1;
    }

    let products = catalog.list_products().await?;
    info!(generated, listed = products.len(), "Seed complete");

    db.close().await;
    Ok(())
}

/// Builds one demo product.
///
/// AirPods keep only the single `price` field so the fallback path has
/// something to resolve against.
fn generate_product(&(id, name, brand, category, usd): &(&str, &str, &str, &str, f64)) -> Product {
    let mut product = Product::new(id, name);
    product.brand = Some(brand.to_string());
    product.category = Some(category.to_string());
    product.in_stock = Some(id != "xbox-series-s");
    product.gallery = vec![format!("https://images.example.com/{id}/1.jpg")];

    if id == "apple-airpods-pro" {
        product.price = Some(usd);
    } else {
        product.prices = CURRENCIES
            .iter()
            .map(|(label, symbol, rate)| {
                let amount = (usd * rate * 100.0).round() / 100.0;
                PriceEntry::new(amount, *label, *symbol)
            })
            .collect();
    }

    if category == "clothes" {
        product.attributes = vec![
            AttributeGroup::new("Size", &["S", "M", "L", "XL"]),
            AttributeGroup::new("Color", &["Red", "Blue", "Black"]),
        ];
    }

    product
}
