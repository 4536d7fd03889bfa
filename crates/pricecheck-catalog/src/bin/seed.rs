//! # Demo Mirror Generator
//!
//! Creates a local catalog mirror with a handful of products so the kiosk
//! can run against the SQLite backend without the hosted table.
//!
//! ## Usage
//! ```bash
//! # Write ./pricecheck_demo.db (default)
//! cargo run -p pricecheck-catalog --bin seed
//!
//! # Specify database path
//! cargo run -p pricecheck-catalog --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Products
//! Each product has a primary `Codigo` and some have alternative codes in
//! `Codigo1`..`Codigo4`. "Yerba Mate 1kg" is only reachable through its
//! `Codigo2` value `7791234567890`.

use pricecheck_catalog::mirror::{count, create_table, insert_row, MirrorRow};
use pricecheck_catalog::{CatalogSchema, ProductLookup, SqliteCatalog, SqliteConfig};
use std::env;

/// (id, name, price, [(code column index, code)])
const PRODUCTS: &[(i64, &str, &str, &[(usize, &str)])] = &[
    (1, "Agua Mineral 500ml", "900", &[(0, "7790001000011")]),
    (2, "Pan Lactal 560g", "2150.75", &[(0, "7790001000028"), (1, "20028")]),
    (3, "Leche Entera 1L", "1380", &[(0, "7790001000035")]),
    (4, "Galletitas Dulces 300g", "1725.3", &[(0, "7790001000042"), (3, "555042")]),
    (5, "Aceite de Girasol 900ml", "3299.99", &[(0, "7790001000059")]),
    (6, "Fideos Spaghetti 500g", "1149.5", &[(1, "7790001000066")]),
    (7, "Yerba Mate 1kg", "2500.5", &[(2, "7791234567890")]),
    (8, "Cafe Molido 250g", "4890", &[(0, "7790001000080"), (4, "808080")]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pricecheck_demo.db");

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
                println!("Price-Check Demo Mirror Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pricecheck_demo.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Price-Check Demo Mirror Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let schema = CatalogSchema::default();
    let catalog = SqliteCatalog::connect(SqliteConfig::new(&db_path).writable(), schema.clone())
        .await?;
    let pool = catalog.pool();

    create_table(pool, &schema).await?;
    println!("✓ Table '{}' ready", schema.table);

    for (id, name, price, codes) in PRODUCTS {
        let row = codes
            .iter()
            .fold(MirrorRow::new(*id, *name, *price), |row, (index, code)| {
                row.code(*index, *code)
            });

        if let Err(e) = insert_row(pool, &schema, &row).await {
            eprintln!("Failed to insert {}: {}", name, e);
        }
    }

    println!("✓ {} products in mirror", count(pool, &schema).await?);

    // Verify the lookup path the kiosk uses
    println!();
    match catalog.lookup("7791234567890").await? {
        Some(product) => println!("  Lookup 7791234567890: {} {}", product.name, product.price),
        None => println!("  Lookup 7791234567890: not found"),
    }

    catalog.close().await;

    println!();
    println!("✓ Seed complete!");
    println!("  Run the kiosk with PRICECHECK_BACKEND=sqlite PRICECHECK_SQLITE_PATH={}", db_path);

    Ok(())
}
