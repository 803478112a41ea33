use anyhow::Context;
use secrecy::ExposeSecret;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::{config, server::run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = config::load()?;
    let backend = config.database.backend()?;
    let pool = establish_connection(
        config.database.url.expose_secret(),
        config.database.max_connections,
    )
    .await
    .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool, backend).await?;

    run_server(pool, &config).await
}
