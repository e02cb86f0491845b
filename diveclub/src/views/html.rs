//! Small HTML builders shared by the views.
//!
//! Every value that reaches the markup goes through [`escape`]; callers pass
//! raw text, never pre-escaped strings.

use std::fmt::Write as _;

use crate::pagination::Page;
use crate::validation::ValidationErrors;

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(input: &str) -> String {
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

/// Wrap `body` in the site layout.
#[must_use]
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="hr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Ronilački klub</title>
</head>
<body>
<nav>
<a href="/">Početna</a> |
<a href="/members/">Members</a> |
<a href="/dives/">Dives</a> |
<a href="/equipment/">Equipment</a> |
<a href="/admin/">Admin</a>
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// `href` with the given query parameters; empty values are left out.
#[must_use]
pub fn link_with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", url_escape::encode_component(value)))
        .collect();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

/// A link; `href` and `text` are both escaped.
#[must_use]
pub fn anchor(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(href), escape(text))
}

fn field_errors(name: &str, errors: &ValidationErrors) -> String {
    let items: String = errors
        .messages_for(name)
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }
}

/// Labelled `<input>` with its error list.
#[must_use]
pub fn input(name: &str, label: &str, kind: &str, value: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}:</label> <input type="{kind}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = field_errors(name, errors),
        label = escape(label),
        value = escape(value),
    )
}

/// Labelled `<select>`; `options` are `(value, label)` pairs.
#[must_use]
pub fn select(
    name: &str,
    label: &str,
    options: &[(String, String)],
    selected: &str,
    errors: &ValidationErrors,
) -> String {
    let mut html = format!(
        r#"<p>{errors}<label for="id_{name}">{label}:</label> <select name="{name}" id="id_{name}">"#,
        errors = field_errors(name, errors),
        label = escape(label),
    );
    for (value, text) in options {
        let marker = if value == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{marker}>{}</option>"#,
            escape(value),
            escape(text)
        );
    }
    html.push_str("</select></p>");
    html
}

#[must_use]
pub fn checkbox(name: &str, label: &str, checked: bool, errors: &ValidationErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}:</label> <input type="checkbox" name="{name}" id="id_{name}"{checked}></p>"#,
        errors = field_errors(name, errors),
        label = escape(label),
        checked = if checked { " checked" } else { "" },
    )
}

/// A POST form around pre-rendered fields.
#[must_use]
pub fn form(action: &str, fields: &[String], submit: &str, cancel: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
{fields}
<button type="submit">{submit}</button> <a href="{cancel}">Cancel</a>
</form>"#,
        action = escape(action),
        fields = fields.join("\n"),
        submit = escape(submit),
        cancel = escape(cancel),
    )
}

/// GET search box; `extra` holds additional pre-rendered controls.
#[must_use]
pub fn search_form(action: &str, q: &str, extra: &str) -> String {
    format!(
        r#"<form method="get" action="{action}">
<input type="search" name="q" value="{q}" placeholder="Search">
{extra}
<button type="submit">Search</button>
</form>"#,
        action = escape(action),
        q = escape(q),
    )
}

/// Table with a header row; cells are pre-rendered HTML.
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>], empty: &str) -> String {
    if rows.is_empty() {
        return format!("<p>{}</p>", escape(empty));
    }

    let mut html = String::from("<table>\n<thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{cell}</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

/// Definition list of `(label, value)` pairs; values are pre-rendered HTML.
#[must_use]
pub fn details(pairs: &[(&str, String)]) -> String {
    let mut html = String::from("<dl>\n");
    for (label, value) in pairs {
        let _ = writeln!(html, "<dt>{}</dt><dd>{value}</dd>", escape(label));
    }
    html.push_str("</dl>");
    html
}

/// Previous/next navigation that keeps the current filters.
#[must_use]
pub fn pagination<T>(path: &str, page: &Page<T>, filters: &[(&str, &str)]) -> String {
    if page.num_pages() <= 1 {
        return String::new();
    }

    let href = |number: String| {
        let mut params = filters.to_vec();
        params.push(("page", number.as_str()));
        link_with_query(path, &params)
    };

    let mut html = String::from(r#"<nav class="pagination">"#);
    if page.has_previous() {
        let _ = write!(
            html,
            "{} {} ",
            anchor(&href("1".to_string()), "« first"),
            anchor(&href((page.number - 1).to_string()), "previous")
        );
    }
    let _ = write!(html, "<span>Page {} of {}</span>", page.number, page.num_pages());
    if page.has_next() {
        let _ = write!(
            html,
            " {} {}",
            anchor(&href((page.number + 1).to_string()), "next"),
            anchor(&href("last".to_string()), "last »")
        );
    }
    html.push_str("</nav>");
    html
}

/// Confirmation page body for deleting `object`.
#[must_use]
pub fn confirm_delete(object: &str, warning: &str, action: &str, cancel: &str) -> String {
    let warning = if warning.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", escape(warning))
    };
    format!(
        r#"<p>Are you sure you want to delete "{object}"?</p>
{warning}
<form method="post" action="{action}">
<button type="submit">Yes, delete</button> <a href="{cancel}">Cancel</a>
</form>"#,
        object = escape(object),
        action = escape(action),
        cancel = escape(cancel),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"Ana" & 'Ivo'</b>"#), "&lt;b&gt;&quot;Ana&quot; &amp; &#x27;Ivo&#x27;&lt;/b&gt;");
        assert_eq!(escape("Crveno more"), "Crveno more");
    }

    #[test]
    fn test_link_with_query_encodes_and_skips_empty() {
        assert_eq!(
            link_with_query("/dives/", &[("q", "Crveno more"), ("type", ""), ("page", "2")]),
            "/dives/?q=Crveno%20more&page=2"
        );
        assert_eq!(link_with_query("/dives/", &[("q", "")]), "/dives/");
    }

    #[test]
    fn test_input_shows_errors_and_escapes_value() {
        let errors = ValidationErrors::single("email", "Enter a valid email address.");
        let html = input("email", "Email", "email", "a\"b", &errors);
        assert!(html.contains("Enter a valid email address."));
        assert!(html.contains(r#"value="a&quot;b""#));
        assert!(!input("first_name", "First name", "text", "", &errors).contains("errorlist"));
    }

    #[test]
    fn test_select_marks_selected() {
        let options = vec![
            ("tank".to_string(), "Boca".to_string()),
            ("fins".to_string(), "Peraje".to_string()),
        ];
        let html = select("equipment_type", "Type", &options, "fins", &ValidationErrors::new());
        assert!(html.contains(r#"<option value="fins" selected>Peraje</option>"#));
        assert!(html.contains(r#"<option value="tank">Boca</option>"#));
    }

    #[test]
    fn test_pagination_keeps_filters() {
        let page: Page<()> = Page {
            items: vec![],
            number: 2,
            per_page: 10,
            total: 30,
        };
        let html = pagination("/equipment/", &page, &[("q", "maska"), ("type", "mask")]);
        assert!(html.contains("/equipment/?q=maska&amp;type=mask&amp;page=1"));
        assert!(html.contains("/equipment/?q=maska&amp;type=mask&amp;page=3"));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn test_single_page_has_no_navigation() {
        let page: Page<()> = Page {
            items: vec![],
            number: 1,
            per_page: 10,
            total: 4,
        };
        assert!(pagination("/members/", &page, &[]).is_empty());
    }

    #[test]
    fn test_empty_table_message() {
        assert_eq!(table(&["Name"], &[], "No members."), "<p>No members.</p>");
    }
}
