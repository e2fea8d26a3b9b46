//! Attar CLI - seeding and reporting tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the store with a demo catalog and banners
//! attar-cli seed
//!
//! # Print dashboard numbers and best sellers
//! attar-cli stats
//! attar-cli stats --top 10
//! ```
//!
//! # Commands
//!
//! - `seed` - Insert a demo catalog, banners and settings
//! - `stats` - Print the dashboard summary
//!
//! Both commands talk to the store configured by `ATTAR_STORE_URL` /
//! `ATTAR_STORE_SERVICE_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "attar-cli")]
#[command(author, version, about = "Attar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the store with demo data
    Seed,
    /// Print the dashboard summary
    Stats {
        /// How many best sellers to show
        #[arg(long, default_value_t = 5)]
        top: usize,
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
        Commands::Seed => commands::seed::run().await?,
        Commands::Stats { top } => commands::stats::run(top).await?,
    }
    Ok(())
}
