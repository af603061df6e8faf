//! # Seed Data Generator
//!
//! Populates a development database with staff, products and sales.
//!
//! ## Usage
//! ```bash
//! # 200 sales over the last 60 days (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amount
//! cargo run -p stockroom-db --bin seed -- --sales 1000
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! Sales go through the sale coordinator, so stock levels and statuses end
//! up exactly as if the sales had been rung up one by one. A sale that would
//! oversell is skipped.

use chrono::{Duration, Utc};
use std::env;
use stockroom_core::input::{CreateSaleInput, NewProduct, NewStaff, ProductFilter};
use stockroom_core::PaymentMethod;
use stockroom_db::{Database, DbConfig, DbError};

/// (category, name, sku, unit, price in cents, opening stock, min stock)
const PRODUCTS: &[(&str, &str, &str, &str, i64, i64, i64)] = &[
    ("Building", "Portland Cement 50kg", "CEM-50", "bag", 850, 400, 40),
    ("Building", "Sharp Sand", "SND-T", "ton", 2500, 60, 10),
    ("Building", "Granite Chippings", "GRN-T", "ton", 3200, 45, 10),
    ("Building", "Hollow Block 6in", "BLK-6", "piece", 45, 3000, 300),
    ("Building", "Hollow Block 9in", "BLK-9", "piece", 60, 2500, 300),
    ("Steel", "Iron Rod 12mm", "ROD-12", "length", 950, 500, 50),
    ("Steel", "Iron Rod 16mm", "ROD-16", "length", 1400, 300, 40),
    ("Steel", "Binding Wire", "BWR-20", "roll", 1800, 80, 15),
    ("Roofing", "Aluminium Sheet 0.45", "ALU-45", "sheet", 1250, 200, 25),
    ("Roofing", "Roofing Nails 3in", "NAIL-3", "kg", 300, 150, 30),
    ("Finishing", "Emulsion Paint 20L", "PNT-E20", "bucket", 2200, 70, 10),
    ("Finishing", "Floor Tiles 60x60", "TIL-60", "carton", 1600, 120, 20),
    ("Plumbing", "PVC Pipe 4in", "PVC-4", "length", 700, 160, 20),
    ("Plumbing", "Water Tank 1000L", "TNK-1000", "piece", 9500, 12, 3),
    ("Electrical", "Cable 2.5mm", "CBL-25", "roll", 4200, 35, 8),
];

/// (employee id, first name, last name, department, position)
const STAFF: &[(&str, &str, &str, &str, &str)] = &[
    ("EMP-001", "Adaeze", "Okafor", "Sales", "Sales Lead"),
    ("EMP-002", "Tunde", "Bakare", "Sales", "Sales Clerk"),
    ("EMP-003", "Halima", "Yusuf", "Sales", "Sales Clerk"),
    ("EMP-004", "Chidi", "Eze", "Warehouse", "Store Keeper"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = 200;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(200);
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
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sales to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db
        .catalog()
        .list_products(&ProductFilter {
            limit: Some(1),
            ..Default::default()
        })
        .await?;
    if !existing.is_empty() {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut staff_ids = Vec::new();
    for (employee_id, first, last, department, position) in STAFF {
        let member = db
            .staff()
            .create(NewStaff {
                employee_id: employee_id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some(format!("{}@stockroom.local", first.to_lowercase())),
                department: department.to_string(),
                position: position.to_string(),
            })
            .await?;
        staff_ids.push(member.id);
    }
    println!("✓ Created {} staff members", staff_ids.len());

    let mut products = Vec::new();
    for (category, name, sku, unit, price, quantity, min_stock) in PRODUCTS {
        let product = db
            .catalog()
            .create_product(NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                description: None,
                sku: sku.to_string(),
                quantity: *quantity,
                min_stock: *min_stock,
                max_stock: Some(quantity * 2),
                unit: unit.to_string(),
                price_per_unit_cents: *price,
                discontinued: false,
                location: Some("Main yard".to_string()),
                supplier: None,
            })
            .await?;
        products.push(product);
    }
    println!("✓ Created {} products", products.len());

    println!();
    println!("Generating sales...");

    let coordinator = db.coordinator();
    let now = Utc::now();
    let start = std::time::Instant::now();
    let mut created = 0;
    let mut skipped = 0;

    for seed in 0..sales {
        let product = &products[(seed * 7) % products.len()];
        let input = CreateSaleInput {
            staff_id: staff_ids[seed % staff_ids.len()].clone(),
            product_id: product.id.clone(),
            quantity: 1 + (seed % 9) as i64,
            unit_price_cents: product.price_per_unit_cents,
            payment_method: PaymentMethod::ALL[seed % PaymentMethod::ALL.len()],
            sale_date: Some(now - Duration::hours(((seed * 13) % (60 * 24)) as i64)),
            customer_name: None,
            customer_phone: None,
            notes: None,
        };

        match coordinator.create_sale(input).await {
            Ok(_) => created += 1,
            Err(DbError::Domain(e)) => {
                skipped += 1;
                if skipped <= 5 {
                    println!("  Skipped: {}", e);
                }
            }
            Err(e) => return Err(e.into()),
        }

        if created > 0 && created % 100 == 0 {
            println!("  Generated {} sales...", created);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} sales in {:?} ({} skipped)", created, elapsed, skipped);

    let low = db.catalog().low_stock_products().await?;
    println!("  Products at or below minimum stock: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
