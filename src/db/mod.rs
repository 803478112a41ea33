pub mod queries;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use sqlx::migrate::Migrator;

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

use sqlx::Error;

static POSTGRES_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/sqlite");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        match url.split_once(':').map(|(scheme, _)| scheme) {
            Some("postgres" | "postgresql") => Ok(Backend::Postgres),
            Some("sqlite") => Ok(Backend::Sqlite),
            _ => anyhow::bail!("Unsupported database url, expected postgres:// or sqlite:"),
        }
    }

    fn migrator(self) -> &'static Migrator {
        match self {
            Backend::Postgres => &POSTGRES_MIGRATIONS,
            Backend::Sqlite => &SQLITE_MIGRATIONS,
        }
    }
}

pub async fn establish_connection(url: &str, max_connections: u32) -> Result<AnyPool, Error> {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Creates the schema if it does not exist yet.
pub async fn run_migrations(pool: &AnyPool, backend: Backend) -> Result<(), Error> {
    backend.migrator().run(pool).await?;
    Ok(())
}

/// Moves the id sequences past imported rows, which were inserted with explicit ids.
pub async fn sync_sequences(pool: &AnyPool, backend: Backend) -> Result<(), Error> {
    if backend == Backend::Sqlite {
        return Ok(());
    }
    for table in ["categories", "questions"] {
        sqlx::query(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE(MAX(id), 0) + 1, false) FROM {table}"
        ))
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Backend;

    #[test]
    fn backend_is_picked_from_url_scheme() {
        assert_eq!(
            Backend::from_url("postgres://postgres@localhost:5432/trivia_test").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgresql://localhost/trivia").unwrap(),
            Backend::Postgres
        );
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert!(Backend::from_url("trivia.db").is_err());
    }
}
