//! HTML pages for the login form.

use std::fmt::Write;

use formcheck_core::validation::ErrorBag;

use crate::flash::Flash;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Bulleted list of every message, or nothing when there are none.
fn error_list(errors: &ErrorBag) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from("    <ul class=\"errors\">\n");
    for message in errors.all() {
        let _ = writeln!(out, "        <li>{}</li>", escape_html(message));
    }
    out.push_str("    </ul>\n");
    out
}

fn field(errors: &ErrorBag, name: &str, label: &str, kind: &str, old: &str) -> String {
    let inline = errors
        .first(name)
        .map(|m| format!("\n        <span class=\"error\">{}</span>", escape_html(m)))
        .unwrap_or_default();
    format!(
        r#"    <label for="{name}">
        {label}{inline}
        <input type="{kind}" id="{name}" name="{name}" value="{value}">
    </label> <br>
"#,
        value = escape_html(old),
    )
}

/// The login form, with flashed errors and old input when present.
pub fn render_form(flash: Option<&Flash>) -> String {
    let empty = ErrorBag::new();
    let errors = flash.map(|f| &f.errors).unwrap_or(&empty);
    let old = |name: &str| flash.map(|f| f.old(name)).unwrap_or("");

    let mut body = error_list(errors);
    body.push_str("    <form action=\"/form\" method=\"post\">\n");
    body.push_str(&field(errors, "username", "Username", "text", old("username")));
    body.push_str(&field(errors, "password", "Password", "password", old("password")));
    body.push_str("        <input type=\"submit\" value=\"Login\">\n    </form>\n");
    page("Login", &body)
}

/// Shown after a successful submission.
pub fn render_success(username: &str) -> String {
    let body = format!("    <p>Login success: {}</p>\n", escape_html(username));
    page("Login", &body)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn blank_form_has_no_error_list() {
        let html = render_form(None);
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("name=\"password\""));
        assert!(!html.contains("class=\"errors\""));
    }

    #[test]
    fn flashed_form_shows_messages_and_old_input() {
        let errors: ErrorBag = [("username", "The username field must be a valid email address.")]
            .into_iter()
            .collect();
        let input = HashMap::from([("username".to_string(), "<tian>".to_string())]);
        let html = render_form(Some(&Flash::new(errors, &input)));

        assert!(html.contains("<li>The username field must be a valid email address.</li>"));
        assert!(html.contains(
            "<span class=\"error\">The username field must be a valid email address.</span>"
        ));
        assert!(html.contains("value=\"&lt;tian&gt;\""));
    }

    #[test]
    fn success_page_escapes_username() {
        assert!(render_success("<b>").contains("Login success: &lt;b&gt;"));
    }
}
