//! Create-form binding and validation, independent of the HTTP framework.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::models::NewBook;

/// Fields of the create form, named as they are posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Price,
    Genre,
    InStock,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Author,
        Field::Price,
        Field::Genre,
        Field::InStock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Price => "Price",
            Field::Genre => "Genre",
            Field::InStock => "InStock",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validation message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Submitted form values exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub price: String,
    pub genre: String,
    pub in_stock: bool,
}

impl BookForm {
    /// Bind raw `name=value` pairs from a form post.
    ///
    /// Names match case-insensitively and unknown names are ignored. Text
    /// fields keep their first value. A checkbox posts nothing when unticked,
    /// and may be paired with a hidden `false` input, so `InStock` is true
    /// when any of its values is truthy.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = BookForm::default();
        let mut seen = Vec::with_capacity(Field::ALL.len());

        for (name, value) in fields {
            let Some(field) = Field::from_name(name.as_ref()) else {
                continue;
            };
            let value = value.into();

            if field == Field::InStock {
                form.in_stock |= is_checked(&value);
                continue;
            }
            if seen.contains(&field) {
                continue;
            }
            seen.push(field);

            match field {
                Field::Title => form.title = value,
                Field::Author => form.author = value,
                Field::Price => form.price = value,
                Field::Genre => form.genre = value,
                Field::InStock => {}
            }
        }

        form
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError::new(Field::Title, "The Title field is required."));
        }

        let author = self.author.trim();
        if author.is_empty() {
            errors.push(FieldError::new(Field::Author, "The Author field is required."));
        }

        let price = match parse_price(&self.price) {
            Ok(price) => Some(price),
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let genre = self.genre.trim();

        match price {
            Some(price) if errors.is_empty() => Ok(NewBook {
                title: title.to_string(),
                author: author.to_string(),
                price,
                genre: (!genre.is_empty()).then(|| genre.to_string()),
                in_stock: self.in_stock,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_price(raw: &str) -> Result<Decimal, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new(Field::Price, "The Price field is required."));
    }

    let invalid = || {
        FieldError::new(
            Field::Price,
            format!("The value '{}' is not valid for Price.", raw),
        )
    };

    if !is_plain_decimal(raw) {
        return Err(invalid());
    }
    let price = Decimal::from_str(raw).map_err(|_| invalid())?;

    if price < Decimal::ZERO {
        return Err(FieldError::new(
            Field::Price,
            "The Price must be zero or greater.",
        ));
    }

    Ok(price)
}

/// Optional sign, digits, and at most one decimal point. `Decimal::from_str`
/// also takes `1_000` and `1e3`, which a price field should not.
fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(raw);
    let mut digits = 0;
    let mut points = 0;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

fn is_checked(value: &str) -> bool {
    let value = value.trim();
    ["true", "on", "1", "yes"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
}
