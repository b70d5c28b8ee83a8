//! Il Pane dei Fratelli CLI - Catalog cache tools.
//!
//! # Usage
//!
//! ```bash
//! # List available products (canonical list or local edits)
//! fratelli catalog list
//!
//! # Check whether the cached catalog would be used
//! fratelli catalog inspect --storage-dir .local-storage
//!
//! # Drop local product edits
//! fratelli catalog reset
//!
//! # Show the slug a product name would get
//! fratelli slugify "Pane di Segale"
//! ```
//!
//! # Commands
//!
//! - `catalog list` - Print products as JSON
//! - `catalog inspect` - Report on the cached snapshot
//! - `catalog reset` - Reset the cache to the canonical products
//! - `slugify` - Print the slug for a name

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::catalog::{self, Paths};

#[derive(Parser)]
#[command(name = "fratelli")]
#[command(author, version, about = "Il Pane dei Fratelli CLI tools")]
struct Cli {
    /// Directory holding the canonical `<name>.json` documents
    #[arg(long, env = "STOREFRONT_CONTENT_DIR", default_value = "crates/storefront/content", global = true)]
    content_dir: PathBuf,

    /// Local storage directory shared with the storefront
    #[arg(long, env = "STOREFRONT_STORAGE_DIR", default_value = ".local-storage", global = true)]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the cached product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Print the slug for a product name
    Slugify {
        /// Product name
        name: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print products as JSON
    List {
        /// Include unavailable products
        #[arg(short, long)]
        all: bool,
    },
    /// Report whether the cached snapshot would be adopted
    Inspect,
    /// Reset the cache to the canonical products
    Reset,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let paths = Paths {
        content_dir: cli.content_dir,
        storage_dir: cli.storage_dir,
    };

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { all } => {
                let products = catalog::list(&paths, all).await?;
                println!("{}", serde_json::to_string_pretty(&products)?);
            }
            CatalogAction::Inspect => {
                println!("{}", catalog::inspect(&paths)?);
            }
            CatalogAction::Reset => {
                let outcome = catalog::reset(&paths).await?;
                if !outcome.is_stored() {
                    return Err(format!("catalog was reset in memory but not cached ({outcome:?})").into());
                }
                println!("Catalog reset to canonical products");
            }
        },
        Commands::Slugify { name } => {
            println!("{}", fratelli_core::slugify(&name));
        }
    }
    Ok(())
}
