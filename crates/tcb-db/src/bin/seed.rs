//! # Seed Data
//!
//! Writes the starter catalog and cash base into a storefront database.
//!
//! ## Usage
//! ```bash
//! # Seed the development database
//! cargo run -p tcb-db --bin seed
//!
//! # Specify database path
//! cargo run -p tcb-db --bin seed -- --db ./data/tcb.db
//! ```
//!
//! Lists that are already stored are left alone, so running the seed twice
//! is harmless.

use chrono::Local;
use std::env;
use tcb_db::menu::{default_menu, default_promotions};
use tcb_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tcb_dev.db");

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
                println!("Container Burger Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tcb_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍔 Container Burger Seed Data");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let menu = default_menu();
    if db.catalog().seed_if_empty(&menu).await? {
        println!("✓ Seeded {} products", menu.len());
    } else {
        println!("⚠ Product list already stored ({} products), skipped", db.catalog().count().await?);
    }

    let promotions = default_promotions(Local::now().date_naive());
    if db.catalog().seed_promotions_if_empty(&promotions).await? {
        println!("✓ Seeded {} promotions", promotions.len());
    } else {
        println!("⚠ Promotion list already stored, skipped");
    }

    let cash_base = db.settings().ensure_cash_base().await?;
    println!("✓ Cash base: {}", cash_base);

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
