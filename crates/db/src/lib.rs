//! SQLite connection pool factory and migration runner.

use std::str::FromStr;

use catalog_kernel::settings::DatabaseSettings;
use catalog_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Errors raised while connecting to or migrating the database
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("invalid database url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration bookkeeping failed: {0}")]
    Bookkeeping(#[source] sqlx::Error),
}

/// Open a connection pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .map_err(|source| DbError::InvalidUrl {
            url: settings.url.clone(),
            source,
        })?
        .create_if_missing(settings.create_if_missing)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(
        target: "catalog-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// Open a private in-memory database.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(DbError::Connect)
}

/// Apply every migration that has not been recorded yet.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns the number of migrations applied by this call.
pub async fn apply_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(DbError::Bookkeeping)?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let already_applied: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM schema_migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .map_err(DbError::Bookkeeping)?;

        if already_applied.is_some() {
            tracing::debug!(target: "catalog-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let failed = |source| DbError::Migration {
            module: module.clone(),
            id: migration.id.to_string(),
            source,
        };

        let mut tx = pool.begin().await.map_err(failed)?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;

        tx.commit().await.map_err(failed)?;

        tracing::info!(target: "catalog-db", %module, id = migration.id, "applied migration");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrations() -> Vec<(String, Migration)> {
        vec![
            (
                "books".to_string(),
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE shelf (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
                },
            ),
            (
                "books".to_string(),
                Migration {
                    id: "002_seed",
                    up: r#"
                        INSERT INTO shelf (name) VALUES ('fiction');
                        INSERT INTO shelf (name) VALUES ('poetry');
                    "#,
                },
            ),
        ]
    }

    #[tokio::test]
    async fn applies_pending_migrations_once() {
        let pool = connect_in_memory().await.unwrap();

        assert_eq!(apply_migrations(&pool, &migrations()).await.unwrap(), 2);
        assert_eq!(apply_migrations(&pool, &migrations()).await.unwrap(), 0);

        let shelves: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shelf")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(shelves, 2);

        let recorded: Vec<String> =
            sqlx::query_scalar("SELECT id FROM schema_migrations ORDER BY id")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(recorded, vec!["001_init", "002_seed"]);
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let pool = connect_in_memory().await.unwrap();
        let broken = vec![(
            "books".to_string(),
            Migration {
                id: "001_broken",
                up: "CREATE TABLE;",
            },
        )];

        let err = apply_migrations(&pool, &broken).await.unwrap_err();
        assert!(matches!(err, DbError::Migration { ref id, .. } if id == "001_broken"));

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }

    #[tokio::test]
    async fn missing_file_without_create_fails_to_connect() {
        let settings = DatabaseSettings {
            url: "sqlite:///nonexistent-catalog-dir/bookstore.db".to_string(),
            create_if_missing: false,
            ..DatabaseSettings::default()
        };

        let err = connect(&settings).await.unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
    }
}
