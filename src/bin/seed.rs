//! Seed the catalog from a CSV export of books.
//!
//! Clears the `books` and `authors` tables, then loads every row of the file.

use std::path::PathBuf;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use bookshelf_server::{
    config::{AppConfig, SeedConfig},
    models::SeedReport,
    repository::Repository,
    seed::{SeedOptions, Seeder},
    telemetry, AppResult,
};

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Reset the catalog and load books from a CSV file")]
struct Args {
    /// CSV file to load (defaults to `seed.csv_path` from the configuration).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Maximum number of rows inserted concurrently.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Only load the first N rows of the file.
    #[arg(long)]
    limit: Option<usize>,
}

impl Args {
    fn apply(self, mut seed: SeedConfig) -> SeedConfig {
        if let Some(file) = self.file {
            seed.csv_path = file;
        }
        if let Some(concurrency) = self.concurrency {
            seed.concurrency = concurrency;
        }
        if self.limit.is_some() {
            seed.row_limit = self.limit;
        }
        seed
    }
}

async fn run(pool: &Pool<Postgres>, seed: &SeedConfig) -> AppResult<SeedReport> {
    sqlx::migrate!("./migrations").run(pool).await?;

    let repository = Repository::new(pool.clone());
    Seeder::new(&repository, SeedOptions::from(seed))
        .seed_file(&seed.csv_path)
        .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.logging);

    let seed = args.apply(config.seed.clone());
    tracing::info!("Seeding catalog from {}", seed.csv_path.display());

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let result = run(&pool, &seed).await;

    // released on every exit path
    pool.close().await;

    match result {
        Ok(report) => {
            if report.failed() > 0 {
                tracing::warn!("{} rows could not be loaded, see errors above", report.failed());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("An error occurred while attempting to seed the database: {}", e);
            Err(e.into())
        }
    }
}
