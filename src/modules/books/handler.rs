//! Request handling for the catalog: listing, the create form, and submissions.

use std::sync::Arc;

use super::form::{BookForm, FieldError};
use super::models::Book;
use super::store::{BookStore, StoreError};

/// Path of the listing page, target of the post-create redirect
pub const LISTING_PATH: &str = "/books";

/// A page selected for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Listing(Vec<Book>),
    CreateForm {
        form: BookForm,
        errors: Vec<FieldError>,
    },
}

/// Result of a create submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the client should navigate to the listing
    Redirect(&'static str),
    /// Invalid; show the form again with the submitted values
    Redisplay(Page),
}

/// Mediates between the HTTP routes and the book store.
pub struct CatalogHandler {
    store: Arc<dyn BookStore>,
}

impl CatalogHandler {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn handle_list(&self) -> Result<Page, StoreError> {
        let books = self.store.list_all().await?;
        tracing::debug!(count = books.len(), "listing books");
        Ok(Page::Listing(books))
    }

    pub fn handle_show_create_form(&self) -> Page {
        Page::CreateForm {
            form: BookForm::default(),
            errors: Vec::new(),
        }
    }

    pub async fn handle_submit_create<I, K, V>(
        &self,
        fields: I,
    ) -> Result<SubmitOutcome, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let form = BookForm::from_fields(fields);

        match form.validate() {
            Ok(book) => {
                let stored = self.store.insert(book).await?;
                tracing::info!(book_id = stored.id, "book created");
                Ok(SubmitOutcome::Redirect(LISTING_PATH))
            }
            Err(errors) => {
                tracing::info!(
                    fields = ?errors.iter().map(|e| e.field.name()).collect::<Vec<_>>(),
                    "book submission rejected"
                );
                Ok(SubmitOutcome::Redisplay(Page::CreateForm { form, errors }))
            }
        }
    }
}
