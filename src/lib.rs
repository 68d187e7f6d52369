//! Book catalog application library
//!
//! Provides the catalog modules and the bootstrap sequence shared by the
//! `catalog-app` binary and the `catalog` CLI.

pub mod modules;

use anyhow::Context;
use axum::Router;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

/// Re-export commonly used types
pub use modules::*;

/// Build a registry holding every project module
pub fn build_registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Apply pending migrations from every module; returns how many ran
pub async fn migrate(registry: &ModuleRegistry, pool: &SqlitePool) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = catalog_db::apply_migrations(pool, &migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(
        applied,
        total = migrations.len(),
        "database migrations complete"
    );
    Ok(applied)
}

/// Migrate, initialize and start every module, and return the HTTP router
pub async fn prepare(
    registry: &ModuleRegistry,
    settings: &Settings,
    pool: &SqlitePool,
) -> anyhow::Result<Router> {
    migrate(registry, pool).await?;

    let ctx = InitCtx { settings, db: pool };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    Ok(catalog_http::build_router(registry, settings))
}

/// Run the full application until shutdown
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "catalog bootstrap starting"
    );

    let pool = catalog_db::connect(&settings.database)
        .await
        .context("failed to open the catalog database")?;
    let registry = build_registry(&pool);

    let app = prepare(&registry, settings, &pool).await?;

    tracing::info!("catalog bootstrap complete");

    let served = catalog_http::start_server(app, settings).await;

    registry.stop_modules().await?;
    pool.close().await;

    served
}
