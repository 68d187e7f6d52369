use std::sync::Arc;

use axum::{extract::State, routing::get, Form, Router};
use catalog_http::error::AppError;

use super::handler::{CatalogHandler, Page, SubmitOutcome};
use super::store::StoreError;

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::StorageUnavailable(e) => AppError::unavailable(e.to_string()),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Routes of the books module, relative to its `/books` mount point
pub fn router(handler: Arc<CatalogHandler>) -> Router {
    tracing::debug!(module = "books", "registering books routes");

    Router::new()
        .route("/", get(list_books))
        .route("/create", get(show_create_form).post(submit_create))
        .with_state(handler)
}

async fn list_books(State(handler): State<Arc<CatalogHandler>>) -> Result<Page, AppError> {
    Ok(handler.handle_list().await?)
}

async fn show_create_form(State(handler): State<Arc<CatalogHandler>>) -> Page {
    handler.handle_show_create_form()
}

async fn submit_create(
    State(handler): State<Arc<CatalogHandler>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<SubmitOutcome, AppError> {
    Ok(handler.handle_submit_create(fields).await?)
}
