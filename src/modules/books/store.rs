//! Durable storage for books.

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::error::ErrorKind;
use sqlx::{FromRow, SqlitePool};

use super::models::{Book, NewBook};

/// SQLite's primary result code for constraint failures
const SQLITE_CONSTRAINT: i32 = 19;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("book storage is unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("book rejected by storage constraint: {0}")]
    ConstraintViolation(String),

    #[error("stored book {id} is unreadable: {reason}")]
    Decode { id: i64, reason: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let constraint_kind = !matches!(db_error.kind(), ErrorKind::Other);
            let constraint_code = db_error
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| code & 0xff == SQLITE_CONSTRAINT);

            if constraint_kind || constraint_code {
                return StoreError::ConstraintViolation(db_error.message().to_string());
            }
        }
        StoreError::StorageUnavailable(error)
    }
}

/// Data access for the catalog. Only listing and inserting are supported.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every stored book, ordered by id (insertion order)
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Persist a book and return it with its assigned id
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;
}

/// `BookStore` backed by the `books` table in SQLite.
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    price: String,
    genre: Option<String>,
    in_stock: bool,
}

impl BookRow {
    fn into_book(self) -> Result<Book, StoreError> {
        let price = Decimal::from_str(&self.price).map_err(|e| StoreError::Decode {
            id: self.id,
            reason: format!("invalid price '{}': {}", self.price, e),
        })?;

        Ok(Book {
            id: self.id,
            title: self.title,
            author: self.author,
            price,
            genre: self.genre,
            in_stock: self.in_stock,
        })
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "SELECT id, title, author, price, genre, in_stock FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookRow::into_book).collect()
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let result = sqlx::query(
            "INSERT INTO books (title, author, price, genre, in_stock) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price.to_string())
        .bind(&book.genre)
        .bind(book.in_stock)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(book_id = id, title = %book.title, "book stored");

        Ok(book.with_id(id))
    }
}
