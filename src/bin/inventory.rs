use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;

use inventory::{InventoryStore, Quantity, Result, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PATH};

#[derive(Parser)]
#[command(name = "inventory", version, about = "A simple JSON-backed inventory tracker")]
struct Cli {
    /// Inventory data file
    #[arg(long, global = true, default_value = DEFAULT_PATH, value_name = "PATH")]
    file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add stock for an item
    Add {
        /// The item name
        item: String,
        /// The quantity to add
        quantity: String,
    },
    /// Remove stock for an item
    Rm {
        /// The item name
        item: String,
        /// The quantity to remove
        quantity: String,
    },
    /// Print the stock of an item
    Get {
        /// The item name
        item: String,
    },
    /// List items with stock below a threshold
    Low {
        /// Items strictly below this quantity are listed
        #[arg(long, default_value = "5")]
        threshold: Quantity,
    },
    /// Print every item and its quantity
    Report,
    /// Run a fixed sequence of sample operations
    Demo,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = cli.file;
    let mut store = InventoryStore::open(&path);

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Add { item, quantity } => {
            match quantity.parse::<Quantity>() {
                Ok(quantity) => store.add(&item, quantity, None),
                Err(e) => error!("{}", e),
            }
            store.try_save(&path)?;
        }
        Commands::Rm { item, quantity } => {
            match quantity.parse::<Quantity>() {
                Ok(quantity) => store.remove(&item, quantity),
                Err(e) => error!("Cannot remove {}: {}", item, e),
            }
            store.try_save(&path)?;
        }
        Commands::Get { item } => println!("{}", store.get_quantity(&item)),
        Commands::Low { threshold } => {
            for item in store.list_below(threshold) {
                println!("{}", item);
            }
        }
        Commands::Report => store.print_report(),
        Commands::Demo => demo(&mut store, &path),
    }

    Ok(())
}

fn demo(store: &mut InventoryStore, path: &Path) {
    println!("--- Running Inventory Operations ---");

    let mut logs = Vec::new();
    store.add("apple", 10, Some(&mut logs));
    store.add("banana", 5, Some(&mut logs));

    // Untyped input is validated and rejected without touching the store.
    store.add_value(&json!(123), &json!("ten"), Some(&mut logs));

    store.remove("apple", 3);
    store.remove("orange", 1);

    for entry in &logs {
        info!("{}", entry);
    }

    println!("Apple stock: {}", store.get_quantity("apple"));
    let low: Vec<&str> = store.list_below(DEFAULT_LOW_STOCK_THRESHOLD).collect();
    println!("Low items (threshold {}): {:?}", DEFAULT_LOW_STOCK_THRESHOLD, low);

    store.save(path);
    println!("--- Operations Complete. Data Saved. ---");
}
