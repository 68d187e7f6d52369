//! Shared HTML page shell.

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wrap a rendered body in the site layout. `body` must already be escaped.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title} - Book Catalog</title>
</head>
<body>
    <header>
        <nav><a href="/books">Book Catalog</a></nav>
    </header>
    <main class="container">
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}
