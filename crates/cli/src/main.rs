//! AvknGifts CLI - Database migrations and catalog tooling.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! avkn-cli migrate
//!
//! # Validate a catalog file before deploying it
//! avkn-cli catalog check
//! avkn-cli catalog check --path ./items.json
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "avkn-cli")]
#[command(author, version, about = "AvknGifts CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Catalog file tooling
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load and validate a catalog file
    Check {
        /// Catalog file path (default: crates/storefront/data/items.json)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(path.as_deref())?,
        },
    }
    Ok(())
}
