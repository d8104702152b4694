//! # Seed Data Generator
//!
//! Populates a development database with suppliers and medicines.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p pharmacy-db --bin seed
//!
//! # Specify database path
//! cargo run -p pharmacy-db --bin seed -- --db ./data/pharmacy.db
//! ```
//!
//! Medicines get a price, an opening stock and an expiry date roughly a year
//! or two out. Users are not seeded: register them through the API so their
//! passwords are hashed the same way as in production.

use std::env;

use chrono::{Duration, Utc};
use pharmacy_core::{Money, NewMedicine, NewSupplier};
use pharmacy_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, contact person, phone, email)
const SUPPLIERS: &[(&str, &str, &str, &str)] = &[
    ("MedSupply Co", "Dana Reyes", "+1 555 0100", "orders@medsupply.test"),
    ("Northwind Pharma", "Sam Okafor", "+1 555 0142", "sales@northwind.test"),
    ("Greenleaf Generics", "Lee Marsh", "+1 555 0199", "hello@greenleaf.test"),
];

/// (name, manufacturer, category, price cents, opening stock, prescription)
const MEDICINES: &[(&str, &str, &str, i64, i64, bool)] = &[
    ("Paracetamol 500mg", "Acme Pharma", "analgesic", 500, 120, false),
    ("Ibuprofen 400mg", "Acme Pharma", "analgesic", 650, 80, false),
    ("Amoxicillin 500mg", "Northwind Pharma", "antibiotic", 1299, 40, true),
    ("Cetirizine 10mg", "Greenleaf Generics", "antihistamine", 399, 60, false),
    ("Omeprazole 20mg", "Greenleaf Generics", "gastrointestinal", 899, 50, false),
    ("Metformin 850mg", "Northwind Pharma", "antidiabetic", 749, 70, true),
    ("Salbutamol Inhaler", "Acme Pharma", "respiratory", 1850, 25, true),
    ("Oral Rehydration Salts", "MedSupply Co", "electrolyte", 199, 200, false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./data/pharmacy.db");

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
                println!("Pharmacy Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/pharmacy.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.medicines().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has medicines, skipping seed");
        return Ok(());
    }

    for (name, contact, phone, email) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .create(&NewSupplier {
                name: name.to_string(),
                contact_person: Some(contact.to_string()),
                phone: Some(phone.to_string()),
                email: Some(email.to_string()),
                address: None,
            })
            .await?;
        info!(id = %supplier.id, name = %supplier.name, "Seeded supplier");
    }

    let today = Utc::now().date_naive();

    for (idx, (name, manufacturer, category, price, stock, rx)) in MEDICINES.iter().enumerate() {
        let medicine = db
            .medicines()
            .create(&NewMedicine {
                name: name.to_string(),
                description: None,
                manufacturer: Some(manufacturer.to_string()),
                category: Some(category.to_string()),
                price: Money::from_cents(*price),
                quantity: *stock,
                expiry_date: Some(today + Duration::days(365 + 45 * idx as i64)),
                requires_prescription: *rx,
            })
            .await?;
        info!(id = %medicine.id, name = %medicine.name, price = %medicine.price(), "Seeded medicine");
    }

    info!(
        suppliers = SUPPLIERS.len(),
        medicines = MEDICINES.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
