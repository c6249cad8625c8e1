//! # Seed Data Generator
//!
//! Populates a development database with a realistic cafe menu and floor
//! plan, so the surfaces have something to render.
//!
//! ## Usage
//! ```bash
//! cargo run -p brew-db --bin seed
//! cargo run -p brew-db --bin seed -- --db ./data/brewpos.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use brew_core::{CafeTable, MenuItem, TableStatus};
use brew_db::{Database, DbConfig};

/// (category, name, description, price in cents)
const MENU: &[(&str, &str, &str, i64)] = &[
    ("Coffee", "Espresso", "Single origin, double shot", 250),
    ("Coffee", "Americano", "Double shot over hot water", 300),
    ("Coffee", "Latte", "Double shot, steamed milk", 450),
    ("Coffee", "Cappuccino", "Double shot, foamed milk", 425),
    ("Coffee", "Flat White", "Ristretto shots, velvet milk", 475),
    ("Coffee", "Mocha", "Espresso, cocoa, steamed milk", 500),
    ("Tea", "English Breakfast", "Loose leaf, pot for one", 350),
    ("Tea", "Green Tea", "Sencha, pot for one", 350),
    ("Tea", "Chai Latte", "House spice blend, steamed milk", 425),
    ("Cold Drinks", "Iced Latte", "Double shot over ice and milk", 475),
    ("Cold Drinks", "Cold Brew", "18 hour steep", 425),
    ("Cold Drinks", "Fresh Orange Juice", "Squeezed to order", 400),
    ("Pastries", "Butter Croissant", "Baked every morning", 325),
    ("Pastries", "Blueberry Muffin", "With streusel top", 300),
    ("Pastries", "Cinnamon Roll", "Cream cheese icing", 375),
    ("Pastries", "Scone", "Plain, with jam and cream", 350),
    ("Food", "Avocado Toast", "Sourdough, chili flakes, lime", 850),
    ("Food", "Ham & Cheese Toastie", "Aged cheddar, dijon", 750),
    ("Food", "Granola Bowl", "Greek yogurt, seasonal fruit", 700),
];

/// (table number, seats)
const TABLES: &[(i64, i64)] = &[
    (1, 2),
    (2, 2),
    (3, 4),
    (4, 4),
    (5, 4),
    (6, 6),
    (7, 6),
    (8, 8),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./brewpos_dev.db");

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
                println!("Brew POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brewpos_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Brew POS Seed Data Generator");
    println!("============================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("Connected, migrations applied");

    let existing = db.menu().count().await?;
    if existing > 0 {
        println!("Database already has {existing} menu items; skipping seed.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (category, name, description, price_cents) in MENU {
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            category: (*category).to_string(),
            price_cents: *price_cents,
            available: true,
            created_at: now,
            updated_at: now,
        };
        db.menu().insert(&item).await?;
    }
    println!("Seeded {} menu items", MENU.len());

    for (table_number, seats) in TABLES {
        let table = CafeTable {
            id: Uuid::new_v4().to_string(),
            table_number: *table_number,
            seats: *seats,
            status: TableStatus::Available,
            created_at: now,
            updated_at: now,
        };
        db.tables().insert(&table).await?;
    }
    println!("Seeded {} tables", TABLES.len());

    println!();
    println!("Seed complete");

    Ok(())
}
