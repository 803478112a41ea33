use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::db::Backend;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    pub questions_per_page: u32,
}

const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/trivia";

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl DatabaseConfig {
    pub fn backend(&self) -> Result<Backend> {
        Backend::from_url(self.url.expose_secret())
    }
}

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.pagination.questions_per_page == 0 {
        anyhow::bail!("pagination.questions_per_page must be greater than zero");
    }
    if cfg.database.max_connections == 0 {
        anyhow::bail!("database.max_connections must be greater than zero");
    }
    cfg.database
        .backend()
        .context("database.url has an unsupported scheme")?;
    Ok(())
}

/// Reads `.env`, an optional `trivia.*` file and `TRIVIA__*` variables, in that order of precedence.
pub fn load() -> Result<Config> {
    dotenv::dotenv().ok();
    let cfg: Config = config::Config::builder()
        .set_default("server.bind", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("database.url", DEFAULT_DATABASE_URL)?
        .set_default("database.max_connections", 5)?
        .set_default("pagination.questions_per_page", 10)?
        .add_source(config::File::with_name("trivia").required(false))
        .add_source(
            config::Environment::with_prefix("TRIVIA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    validate(&cfg)?;
    tracing::debug!(addr = %cfg.server.addr(), "Configuration loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(url: &str) -> Config {
        Config {
            server: ServerConfig {
                bind: "127.0.0.1".to_owned(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: SecretString::from(url.to_owned()),
                max_connections: 1,
            },
            pagination: PaginationConfig {
                questions_per_page: 10,
            },
        }
    }

    #[test]
    fn accepts_postgres_and_sqlite_urls() {
        assert!(validate(&sample("postgres://postgres@localhost:5432/trivia_test")).is_ok());
        assert!(validate(&sample("sqlite::memory:")).is_ok());
    }

    #[test]
    fn rejects_unknown_scheme_and_zero_page_size() {
        assert!(validate(&sample("mysql://localhost/trivia")).is_err());

        let mut cfg = sample("sqlite::memory:");
        cfg.pagination.questions_per_page = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn database_url_is_redacted_in_debug_output() {
        let cfg = sample("postgres://admin:hunter2@db/trivia");
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
