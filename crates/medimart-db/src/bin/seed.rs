//! # Seed Data Generator
//!
//! Populates the database with demo marketplace data for development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p medimart-db --bin seed
//!
//! # Place more demo orders
//! cargo run -p medimart-db --bin seed -- --orders 30
//!
//! # Specify database path
//! cargo run -p medimart-db --bin seed -- --db ./data/medimart.db
//! ```
//!
//! ## Generated Data
//! - One admin account (provisioned directly, the way ops would)
//! - Three medicine stores: two verified, one still pending review
//! - Two patients
//! - A formulary of common medicines spread across the store shelves,
//!   with per-store price differences and a few low-stock thresholds
//! - Demo orders in assorted lifecycle stages, including one
//!   cancellation that restocks the shelf

use std::env;

use medimart_core::{OrderStatus, TransitionPolicy, VerificationStatus};
use medimart_db::{CatalogFilter, Database, DbConfig, StockRequest, StoreProfile};

/// Demo formulary: (name, generic name, category, dosage, base price cents)
const FORMULARY: &[(&str, &str, &str, &str, i64)] = &[
    ("Paracetamol 500mg", "Acetaminophen", "Analgesics", "500mg", 450),
    ("Ibuprofen 200mg", "Ibuprofen", "Analgesics", "200mg", 520),
    ("Aspirin 300mg", "Acetylsalicylic Acid", "Analgesics", "300mg", 380),
    ("Naproxen 250mg", "Naproxen", "Analgesics", "250mg", 610),
    ("Amoxicillin 500mg", "Amoxicillin", "Antibiotics", "500mg", 1250),
    ("Azithromycin 250mg", "Azithromycin", "Antibiotics", "250mg", 1480),
    ("Ciprofloxacin 500mg", "Ciprofloxacin", "Antibiotics", "500mg", 1320),
    ("Doxycycline 100mg", "Doxycycline", "Antibiotics", "100mg", 990),
    ("Omeprazole 20mg", "Omeprazole", "Antacids", "20mg", 870),
    ("Pantoprazole 40mg", "Pantoprazole", "Antacids", "40mg", 940),
    ("Famotidine 20mg", "Famotidine", "Antacids", "20mg", 560),
    ("Antacid Chewables", "Calcium Carbonate", "Antacids", "500mg", 430),
    ("Cetirizine 10mg", "Cetirizine", "Antihistamines", "10mg", 480),
    ("Loratadine 10mg", "Loratadine", "Antihistamines", "10mg", 510),
    ("Fexofenadine 120mg", "Fexofenadine", "Antihistamines", "120mg", 760),
    ("Diphenhydramine 25mg", "Diphenhydramine", "Antihistamines", "25mg", 390),
    ("Vitamin C 500mg", "Ascorbic Acid", "Vitamins", "500mg", 620),
    ("Vitamin D3 1000IU", "Cholecalciferol", "Vitamins", "1000IU", 680),
    ("Multivitamin Daily", "Multivitamin", "Vitamins", "1 tablet", 890),
    ("Zinc 50mg", "Zinc Gluconate", "Vitamins", "50mg", 540),
    ("Cough Syrup 100ml", "Dextromethorphan", "Cold and Flu", "100ml", 720),
    ("Throat Lozenges", "Benzocaine", "Cold and Flu", "2mg", 350),
    ("Nasal Spray 10ml", "Oxymetazoline", "Cold and Flu", "10ml", 640),
    ("Cold Relief Tablets", "Phenylephrine", "Cold and Flu", "10mg", 580),
];

/// Manufacturers rotated across the formulary
const MANUFACTURERS: &[&str] = &[
    "Acme Pharma",
    "Medco Labs",
    "Zenith Healthcare",
    "PureLife Remedies",
];

/// Demo stores: (auth id, owner, store name, address, phone, license, verified)
const STORES: &[(&str, &str, &str, &str, &str, &str, bool)] = &[
    (
        "seed-store-city",
        "Dana Whitfield",
        "City Pharmacy",
        "12 Harbour Road, Dockside District",
        "+1 555 010 9900",
        "PH-2291",
        true,
    ),
    (
        "seed-store-greenleaf",
        "Arjun Mehta",
        "GreenLeaf Chemist",
        "48 Elm Avenue, Northgate",
        "+1 555 010 4417",
        "PH-1083",
        true,
    ),
    (
        "seed-store-corner",
        "Rosa Delgado",
        "Corner Drugstore",
        "7 Station Square, Old Town",
        "+1 555 010 7733",
        "PH-3350",
        false,
    ),
];

/// Demo patients: (auth id, name, email)
const PATIENTS: &[(&str, &str, &str)] = &[
    ("seed-patient-pat", "Pat Example", "pat@example.com"),
    ("seed-patient-sam", "Sam Carter", "sam@example.com"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 12;
    let mut db_path = String::from("./medimart_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(12);
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
                println!("MediMart Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Number of demo orders to place (default: 12)");
                println!("  -d, --db <PATH>    Database file path (default: ./medimart_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MediMart Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Orders:   {}", order_count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check for existing data
    let existing = db.users().list_stores(None).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} stores", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Admin accounts are provisioned out of band, not through any API
    // route. The seed does the same thing ops would do.
    let admin = db
        .users()
        .ensure_user("seed-admin", "Marketplace Admin", "admin@medimart.dev")
        .await?;
    sqlx::query("UPDATE users SET role = 'ADMIN' WHERE id = ?")
        .bind(&admin.id)
        .execute(db.pool())
        .await?;
    println!("✓ Admin account ready");

    // Stores
    println!();
    println!("Creating stores...");

    let mut store_ids = Vec::new();
    for (auth_id, owner, store_name, address, phone, license, verified) in STORES {
        let user = db
            .users()
            .ensure_user(auth_id, owner, &format!("{auth_id}@medimart.dev"))
            .await?;
        db.users()
            .onboard_store(
                &user.id,
                &StoreProfile {
                    store_name: store_name.to_string(),
                    store_address: address.to_string(),
                    store_phone: phone.to_string(),
                    store_license: license.to_string(),
                    store_description: Some(format!(
                        "{store_name} is a neighbourhood pharmacy serving walk-in and online customers."
                    )),
                },
            )
            .await?;
        if *verified {
            db.users()
                .set_verification(&user.id, VerificationStatus::Verified)
                .await?;
        }
        println!(
            "  {} ({})",
            store_name,
            if *verified { "VERIFIED" } else { "PENDING" }
        );
        store_ids.push(user.id);
    }

    // Patients
    let mut patient_ids = Vec::new();
    for (auth_id, name, email) in PATIENTS {
        let user = db.users().ensure_user(auth_id, name, email).await?;
        db.users().onboard_patient(&user.id).await?;
        patient_ids.push(user.id);
    }
    println!("✓ {} patients onboarded", patient_ids.len());

    // Shelves: each store stocks an overlapping slice of the formulary
    // at slightly different prices.
    println!();
    println!("Stocking shelves...");

    let slices: &[std::ops::Range<usize>] = &[0..16, 8..FORMULARY.len(), 0..8];
    let mut shelved = 0;
    for (store_idx, (store_id, slice)) in store_ids.iter().zip(slices).enumerate() {
        for idx in slice.clone() {
            let (name, generic, category, dosage, base_price) = FORMULARY[idx];
            db.inventory()
                .add_or_merge(
                    store_id,
                    &StockRequest {
                        medicine_name: name.to_string(),
                        generic_name: Some(generic.to_string()),
                        category: category.to_string(),
                        manufacturer: Some(MANUFACTURERS[idx % MANUFACTURERS.len()].to_string()),
                        dosage: Some(dosage.to_string()),
                        description: None,
                        price_cents: base_price + (store_idx as i64) * 25,
                        stock: 5 + ((idx * 13) % 60) as i64,
                        min_stock_level: if idx % 3 == 0 { Some(10) } else { None },
                    },
                )
                .await?;
            shelved += 1;
        }
    }
    println!("✓ {} shelf entries created", shelved);

    // Orders in assorted lifecycle stages. Only verified stores are
    // purchasable, so everything lands on the first two shelves.
    println!();
    println!("Placing orders...");

    let catalog = db
        .inventory()
        .search_catalog(&CatalogFilter {
            limit: 50,
            ..Default::default()
        })
        .await?;

    let policy = TransitionPolicy::default();
    let mut placed = 0;
    for i in 0..order_count {
        let row = &catalog[i % catalog.len()];
        let patient_id = &patient_ids[i % patient_ids.len()];
        let quantity = 1 + (i % 3) as i64;

        let order = match db.orders().place(patient_id, &row.id, quantity, None).await {
            Ok(order) => order,
            Err(e) => {
                eprintln!("Failed to place order for {}: {}", row.name, e);
                continue;
            }
        };
        placed += 1;

        match i % 4 {
            1 => {
                db.orders()
                    .advance(&order.store_id, &order.id, OrderStatus::Confirmed, policy, None)
                    .await?;
            }
            2 => {
                db.orders()
                    .advance(&order.store_id, &order.id, OrderStatus::Delivered, policy, None)
                    .await?;
            }
            3 => {
                db.orders().cancel(patient_id, &order.id, policy).await?;
            }
            _ => {}
        }
    }
    println!("✓ {} orders placed", placed);

    // Summary
    println!();
    println!("Marketplace snapshot:");
    println!("  Catalog entries visible to patients: {}", catalog.len());
    for (store_id, (_, _, store_name, ..)) in store_ids.iter().zip(STORES) {
        let stats = db.orders().statistics(store_id).await?;
        println!(
            "  {}: {} recent orders, {} cents delivered revenue",
            store_name, stats.recent_orders, stats.total_revenue_cents
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
