//! Backtick identifier quoting.
//!
//! - `a` renders as `` `a` ``, `a.b` as `` `a`.`b` ``, `*` stays bare
//! - `json_data->uid` renders as `` `json_data`->'$.uid' `` (`->>` is kept)
//! - text that already contains quotes, spaces or parentheses is treated as
//!   an expression and passed through unchanged
//!
//! # Example
//! ```
//! use fluentdb::ident::{parse_keyword_text, quote_field};
//!
//! assert_eq!(quote_field("t.id"), "`t`.`id`");
//! let kw = parse_keyword_text("db.member as m");
//! assert_eq!(kw.keywords, vec!["db", "member"]);
//! assert_eq!(kw.alias.as_deref(), Some("m"));
//! ```

use regex::Regex;
use std::sync::LazyLock;

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?P<name>\S+?)(?:\s+(?:as\s+)?(?P<alias>\S+))?\s*$")
        .expect("keyword regex is valid")
});

static JSON_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<column>[^\s\-]+)(?P<arrow>->>?)(?P<path>.+)$")
        .expect("json path regex is valid")
});

/// Result of splitting `"db.table as alias"` style text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyword {
    /// Dot-separated name parts with quoting removed.
    pub keywords: Vec<String>,
    pub alias: Option<String>,
}

/// Split keyword text into its dotted name parts and optional alias.
pub fn parse_keyword_text(text: &str) -> Keyword {
    let Some(caps) = KEYWORD_RE.captures(text) else {
        return Keyword::default();
    };
    let keywords = caps["name"]
        .split('.')
        .map(|part| part.trim_matches('`').to_string())
        .collect();
    let alias = caps
        .name("alias")
        .map(|m| m.as_str().trim_matches('`').to_string());
    Keyword { keywords, alias }
}

/// Quote a single identifier part.
pub fn quote_name(name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a (possibly dotted or JSON path) field reference.
pub fn quote_field(field: &str) -> String {
    if is_expression(field) {
        return field.to_string();
    }
    if let Some(caps) = JSON_PATH_RE.captures(field) {
        return format!(
            "{}{}{}",
            quote_dotted(&caps["column"]),
            &caps["arrow"],
            json_path_literal(&caps["path"])
        );
    }
    quote_dotted(field)
}

/// Split `column->path` into the quoted column and the `'$.path'` literal.
pub(crate) fn split_json_field(field: &str) -> Option<(String, String)> {
    let caps = JSON_PATH_RE.captures(field)?;
    Some((quote_dotted(&caps["column"]), json_path_literal(&caps["path"])))
}

fn json_path_literal(path: &str) -> String {
    let path = path.trim_matches('\'');
    let path = if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    };
    format!("'{}'", path.replace('\'', "\\'"))
}

fn quote_dotted(field: &str) -> String {
    field
        .split('.')
        .map(quote_name)
        .collect::<Vec<_>>()
        .join(".")
}

/// Join quoted keyword parts with `.` and append `as alias`.
pub fn keyword_to_text(parts: &[Option<&str>], alias: Option<&str>) -> String {
    let mut out = parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .map(|p| quote_name(p))
        .collect::<Vec<_>>()
        .join(".");
    if let Some(alias) = alias.filter(|a| !a.is_empty()) {
        out.push_str(" as ");
        out.push_str(&quote_name(alias));
    }
    out
}

/// Whether the name is a plain `[A-Za-z_][A-Za-z0-9_]*` identifier.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_expression(field: &str) -> bool {
    field.is_empty() || field.contains(['`', '(', ')', ' ', '\'', '"'])
}
