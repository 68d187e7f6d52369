use std::fmt::Write;

use axum::response::{Html, IntoResponse, Redirect, Response};
use catalog_http::page::{escape, layout};

use super::form::{BookForm, Field, FieldError};
use super::handler::{Page, SubmitOutcome};
use super::models::Book;

pub const CREATE_PATH: &str = "/books/create";

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let html = match &self {
            Page::Listing(books) => render_listing(books),
            Page::CreateForm { form, errors } => render_create_form(form, errors),
        };
        Html(html).into_response()
    }
}

impl IntoResponse for SubmitOutcome {
    fn into_response(self) -> Response {
        match self {
            // 303 so the browser follows with a GET and a refresh cannot resubmit
            SubmitOutcome::Redirect(path) => Redirect::to(path).into_response(),
            SubmitOutcome::Redisplay(page) => page.into_response(),
        }
    }
}

pub fn render_listing(books: &[Book]) -> String {
    let mut rows = String::new();
    for book in books {
        let _ = write!(
            rows,
            r#"
                <tr>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{}</td>
                    <td>{}</td>
                </tr>"#,
            escape(&book.title),
            escape(&book.author),
            book.price,
            escape(book.genre.as_deref().unwrap_or_default()),
            if book.in_stock { "Yes" } else { "No" },
        );
    }

    let body = format!(
        r#"        <h2>Book List</h2>
        <table class="table">
            <thead>
                <tr>
                    <th>Title</th>
                    <th>Author</th>
                    <th>Price</th>
                    <th>Genre</th>
                    <th>In Stock</th>
                </tr>
            </thead>
            <tbody>{rows}
            </tbody>
        </table>

        <a href="{create}" class="btn btn-primary">Add New Book</a>"#,
        rows = rows,
        create = CREATE_PATH,
    );

    layout("Book List", &body)
}

pub fn render_create_form(form: &BookForm, errors: &[FieldError]) -> String {
    let mut body = String::from("        <h2>Add New Book</h2>\n");

    if !errors.is_empty() {
        body.push_str("        <div class=\"validation-summary-errors text-danger\">\n            <ul>\n");
        for error in errors {
            let _ = writeln!(body, "                <li>{}</li>", escape(&error.message));
        }
        body.push_str("            </ul>\n        </div>\n");
    }

    let _ = writeln!(body, r#"        <form action="{}" method="post">"#, CREATE_PATH);
    for (field, label, value) in [
        (Field::Title, "Title", form.title.as_str()),
        (Field::Author, "Author", form.author.as_str()),
        (Field::Price, "Price", form.price.as_str()),
        (Field::Genre, "Genre", form.genre.as_str()),
    ] {
        let _ = write!(
            body,
            r#"            <div class="form-group">
                <label for="{name}">{label}</label>
                <input id="{name}" name="{name}" value="{value}" class="form-control" />
{messages}            </div>
"#,
            name = field.name(),
            label = label,
            value = escape(value),
            messages = field_messages(field, errors),
        );
    }

    let _ = write!(
        body,
        r#"            <div class="form-group">
                <label for="{name}">In Stock</label>
                <input id="{name}" name="{name}" type="checkbox" value="true"{checked} />
            </div>
            <button type="submit" class="btn btn-success">Save</button>
        </form>
        <a href="/books">Back to List</a>"#,
        name = Field::InStock.name(),
        checked = if form.in_stock { " checked" } else { "" },
    );

    layout("Add New Book", &body)
}

fn field_messages(field: Field, errors: &[FieldError]) -> String {
    errors
        .iter()
        .filter(|error| error.field == field)
        .map(|error| {
            format!(
                "                <span class=\"text-danger field-validation-error\" data-field=\"{}\">{}</span>\n",
                field.name(),
                escape(&error.message)
            )
        })
        .collect()
}
