//! Shared application state.

use stockroom_db::{Database, ProductCatalog, RetryPolicy, SaleCoordinator};

/// Handed to every handler as `State<Arc<AppState>>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub coordinator: SaleCoordinator,
    pub catalog: ProductCatalog,
}

impl AppState {
    pub fn new(db: Database, retry: RetryPolicy) -> Self {
        AppState {
            coordinator: db.coordinator().with_retry_policy(retry),
            catalog: db.catalog().with_retry_policy(retry),
            db,
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_state() -> std::sync::Arc<AppState> {
    use stockroom_db::DbConfig;

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    std::sync::Arc::new(AppState::new(db, RetryPolicy::default()))
}
