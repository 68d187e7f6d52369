use rust_decimal::Decimal;

/// A stored catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Storage-assigned identifier, never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: Option<String>,
    pub in_stock: bool,
}

/// A validated book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: Option<String>,
    pub in_stock: bool,
}

impl NewBook {
    /// Attach the identifier assigned by storage
    pub fn with_id(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price,
            genre: self.genre,
            in_stock: self.in_stock,
        }
    }
}
