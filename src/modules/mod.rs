pub mod books;

use std::sync::Arc;

use catalog_kernel::ModuleRegistry;
use sqlx::SqlitePool;

use books::store::SqliteBookStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(books::create_module(Arc::new(SqliteBookStore::new(
        pool.clone(),
    ))));
}
