//! # Seed Data Generator
//!
//! Populates a data directory with the sample menu and demo accounts.
//!
//! ## Usage
//! ```bash
//! # Seed ./hmpos_data with the default demo password
//! cargo run -p hmpos-store --bin seed
//!
//! # Custom directory and password
//! cargo run -p hmpos-store --bin seed -- --dir ./data --password letmein
//! ```
//!
//! Collections that already hold data are left alone.

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;

use hmpos_store::{seed_store, Store, StoreConfig};

const DEFAULT_DIR: &str = "./hmpos_data";
const DEFAULT_PASSWORD: &str = "hmpos123";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut dir = String::from(DEFAULT_DIR);
    let mut password = String::from(DEFAULT_PASSWORD);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("HM POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>        Data directory (default: {})", DEFAULT_DIR);
                println!("  -p, --password <PASS>   Demo account password (default: {})", DEFAULT_PASSWORD);
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 HM POS Seed Data Generator");
    println!("=============================");
    println!("Data directory: {}", dir);
    println!();

    let store = Store::open(StoreConfig::file(&dir)).await?;
    let report = seed_store(&store, &password, Utc::now()).await?;

    if report.menu_seeded {
        let menu = store.menu().list().await?;
        println!("✓ Seeded {} menu items", menu.len());
    } else {
        println!("⚠ Menu already has items, skipped");
    }

    if report.users_seeded {
        for account in store.users().list().await? {
            println!("✓ {:<20} {}", account.user.email, account.user.role);
        }
    } else {
        println!("⚠ Accounts already exist, skipped");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
