use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use bid_data::ProductCatalogLoader;
use bid_db_sqlite::SqliteRepository;

/// Load product catalog data from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - code: the product code (e.g. PC-7)
/// - name: display name for the product
/// - price: unit price as a decimal (e.g. 5.25)
#[derive(Parser, Debug)]
#[command(name = "bid-catalog-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing product catalog data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g. sqlite:estimates.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:estimates.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    println!("Loading product catalog from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = ProductCatalogLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let written = ProductCatalogLoader::load(&repo, &records)
        .await
        .context("Failed to load product catalog into database")?;

    println!("Successfully loaded {written} products into the catalog.");

    Ok(())
}
