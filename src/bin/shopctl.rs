//! Management CLI: inventory listing/adjustment and one-off order
//! re-replication to the secondary record-keeping service.
//!
//! ```bash
//! shopctl seed
//! shopctl inventory list
//! shopctl inventory set --title "django" 25
//! shopctl inventory add --id <uuid> 10
//! shopctl sync --order-id <uuid>
//! shopctl sync --all
//! ```

use std::error::Error;
use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use shop_service::create_pool;
use shop_service::domain::ports::{OrderStore, ProductCatalog};
use shop_service::domain::product::ProductView;
use shop_service::infrastructure::catalog::DieselCatalog;
use shop_service::infrastructure::checkout_store::DieselOrderStore;
use shop_service::replication::{SecondaryClient, SecondaryConfig};

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(author, version, about = "Shop management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a small demo catalog into an empty database
    Seed,
    /// Inspect and adjust product inventory
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Re-replicate committed orders to the secondary service
    Sync {
        /// Sync a specific order
        #[arg(long, conflicts_with = "all")]
        order_id: Option<Uuid>,

        /// Sync all orders
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum InventoryAction {
    /// List all products with their inventory levels
    List,
    /// Set inventory to a specific amount
    Set {
        #[command(flatten)]
        selector: ProductSelector,

        /// New inventory level
        amount: i32,
    },
    /// Add an amount to the current inventory
    Add {
        #[command(flatten)]
        selector: ProductSelector,

        /// Amount to add
        amount: i32,
    },
}

#[derive(Args)]
struct ProductSelector {
    /// Product id
    #[arg(long, conflicts_with = "title")]
    id: Option<Uuid>,

    /// Case-insensitive title substring; must match exactly one product
    #[arg(long)]
    title: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = create_pool(&database_url);
    let catalog = Arc::new(DieselCatalog::new(pool.clone()));
    let orders = DieselOrderStore::new(pool);

    match cli.command {
        Commands::Seed => seed(catalog.as_ref()),
        Commands::Inventory { action } => match action {
            InventoryAction::List => list_inventory(catalog.as_ref()),
            InventoryAction::Set { selector, amount } => {
                let product = resolve_product(catalog.as_ref(), &selector)?;
                let updated = catalog.set_inventory(product.id, amount)?;
                println!("Set {} inventory to {}", updated.title, updated.inventory);
                Ok(())
            }
            InventoryAction::Add { selector, amount } => {
                let product = resolve_product(catalog.as_ref(), &selector)?;
                let updated = catalog.add_inventory(product.id, amount)?;
                println!(
                    "Added {} to {}. New inventory: {}",
                    amount, updated.title, updated.inventory
                );
                Ok(())
            }
        },
        Commands::Sync { order_id, all } => {
            let client = SecondaryClient::new(&SecondaryConfig::from_env())?;
            match (order_id, all) {
                (Some(id), _) => {
                    let order = orders.find_by_id(id)?.ok_or("order not found")?;
                    sync_one(&client, catalog.as_ref(), order).await;
                    Ok(())
                }
                (None, true) => {
                    let mut page = 1;
                    loop {
                        let batch = orders.list(page, 100)?;
                        if batch.items.is_empty() {
                            break;
                        }
                        for summary in batch.items {
                            // The list view carries no items; re-read the full order.
                            if let Some(order) = orders.find_by_id(summary.id)? {
                                sync_one(&client, catalog.as_ref(), order).await;
                            }
                        }
                        page += 1;
                    }
                    Ok(())
                }
                (None, false) => Err("Please specify --order-id or --all".into()),
            }
        }
    }
}

fn seed(catalog: &DieselCatalog) -> Result<(), Box<dyn Error>> {
    let books = catalog.create_category("Books", "books", "Printed and digital books")?;
    let products = [
        ("Django for Beginners", "django-for-beginners", "10.00", 5),
        ("Rust in Action", "rust-in-action", "25.00", 5),
        ("The Pragmatic Programmer", "the-pragmatic-programmer", "42.50", 10),
    ];
    for (title, slug, price, inventory) in products {
        let product = catalog.create_product(
            books.id,
            title,
            slug,
            "",
            BigDecimal::from_str(price)?,
            inventory,
        )?;
        println!("Seeded {} ({})", product.title, product.id);
    }
    println!("Seeded category \"{}\" with {} products", books.name, products.len());
    Ok(())
}

fn list_inventory(catalog: &dyn ProductCatalog) -> Result<(), Box<dyn Error>> {
    let products = catalog.list_products(None)?;
    println!("\nCurrent Inventory Levels:");
    println!("{}", "-".repeat(50));
    for product in products {
        let mark = if product.inventory > 0 { "✓" } else { "✗" };
        println!("{} {}: {}", mark, product.title, product.inventory);
    }
    println!("{}", "-".repeat(50));
    Ok(())
}

fn resolve_product(
    catalog: &dyn ProductCatalog,
    selector: &ProductSelector,
) -> Result<ProductView, Box<dyn Error>> {
    match (&selector.id, &selector.title) {
        (Some(id), _) => Ok(catalog
            .find(*id)?
            .ok_or_else(|| format!("Product with ID {id} not found"))?),
        (None, Some(title)) => {
            let mut matches = catalog.list_products(Some(title))?;
            match matches.len() {
                0 => Err(format!("Product with title containing \"{title}\" not found").into()),
                1 => Ok(matches.remove(0)),
                n => Err(format!("\"{title}\" matches {n} products; be more specific").into()),
            }
        }
        (None, None) => Err("Please specify --id or --title".into()),
    }
}

async fn sync_one(client: &SecondaryClient, catalog: &dyn ProductCatalog, order: shop_service::domain::order::OrderView) {
    let id = order.id;
    match client.sync_order(&order, catalog).await {
        Ok(()) => println!("Successfully synced order {id}"),
        Err(e) => eprintln!("Failed to sync order {id}: {e}"),
    }
}
