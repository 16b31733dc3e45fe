//! Shoebox CLI - operate a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! shoebox show
//!
//! # Add one unit of product 1
//! shoebox add 1
//!
//! # Set product 1 to exactly 3 units
//! shoebox set 1 3
//!
//! # Remove product 1
//! shoebox remove 1
//! ```
//!
//! Configuration comes from the environment (see `shoebox_cart::config`):
//! `SHOEBOX_CATALOG_URL` points at the catalog/stock service and
//! `SHOEBOX_SNAPSHOT_PATH` at the persisted cart snapshot.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use shoebox_cart::catalog::HttpCatalogClient;
use shoebox_cart::config::CartConfig;
use shoebox_cart::notify::Notifier;
use shoebox_cart::storage::JsonFileStorage;
use shoebox_cart::store::{CartStore, UpdateProductAmount};
use shoebox_core::{Cart, ProductId};

#[derive(Parser)]
#[command(name = "shoebox")]
#[command(author, version, about = "Shoebox cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Catalog identifier
        product_id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog identifier
        product_id: i32,
    },
    /// Set a product to an exact quantity
    Set {
        /// Catalog identifier
        product_id: i32,
        /// Target quantity
        amount: i32,
    },
}

/// Notifier that prints user-facing messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
struct StderrNotifier;

impl Notifier for StderrNotifier {
    #[allow(clippy::print_stderr)]
    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for item in cart.items() {
        println!(
            "{:>4}  {:<40} x{:<3} {:>10}",
            item.product.id,
            item.product.title,
            item.amount,
            item.line_price().to_string(),
        );
    }
    println!("{} item(s), subtotal {}", cart.total_amount(), cart.subtotal());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = CartConfig::from_env()?;
    let store = CartStore::open(
        Arc::new(HttpCatalogClient::new(&config)?),
        Arc::new(JsonFileStorage::new(&config.snapshot_path)),
        Arc::new(StderrNotifier),
    )
    .await?;

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => store.add_product(ProductId::new(product_id)).await,
        Commands::Remove { product_id } => store.remove_product(ProductId::new(product_id)).await,
        Commands::Set { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(product_id),
                    amount,
                })
                .await;
        }
    }

    print_cart(&store.cart().await);

    Ok(())
}
