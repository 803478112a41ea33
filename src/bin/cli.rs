use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use trivia_api::config;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::telemetry::init_tracing;
use trivia_api::transfer::{export_data, import_data};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database url, overrides TRIVIA__DATABASE__URL
    #[clap(long)]
    database_url: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema
    Migrate,
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = config::load()?;
    if let Some(url) = cli.database_url {
        config.database.url = url.into();
    }
    let backend = config.database.backend()?;
    let pool = establish_connection(
        config.database.url.expose_secret(),
        config.database.max_connections,
    )
    .await
    .context("Cannot connect to DB")?;
    run_migrations(&pool, backend).await?;

    match cli.command {
        Commands::Migrate => tracing::info!("Schema is up to date"),
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
        Commands::Import { path } => import_data(&pool, backend, &path)
            .await
            .context("Cannot import")?,
    }
    Ok(())
}
