//! Connection pool and schema setup.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::DatabaseConfig;
use crate::migration::Migrator;

/// Every connection to `sqlite::memory:` opens its own empty database, so the
/// pool is pinned to one connection for such URLs.
fn is_in_memory(url: &str) -> bool {
    url.starts_with("sqlite") && url.contains(":memory:")
}

/// Open the connection pool described by `config`.
///
/// # Errors
///
/// Returns an error if the URL is unsupported or the database is unreachable.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let max_connections = if is_in_memory(&config.url) {
        1
    } else {
        config.max_connections
    };

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(true);

    let db = Database::connect(options).await?;
    tracing::info!(backend = ?db.get_database_backend(), max_connections, "Connected to database");
    Ok(db)
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns the first migration error.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    Migrator::up(db, None).await?;
    tracing::info!(applied = pending, "Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://:memory:"));
        assert!(!is_in_memory("sqlite://diveclub.db?mode=rwc"));
        assert!(!is_in_memory("postgres://localhost/diveclub"));
    }

    #[tokio::test]
    async fn test_connect_and_migrate_in_memory() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
        };
        let db = connect(&config).await.unwrap();
        migrate(&db).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        // A second run is a no-op.
        migrate(&db).await.unwrap();
    }
}
