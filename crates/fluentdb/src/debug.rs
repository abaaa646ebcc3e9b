//! Inline bind values into SQL for human consumption.

use crate::param::Binds;

/// Render `sql` with its binds substituted as literals.
///
/// `:name` placeholders are matched on whole names (`:p1` never matches
/// inside `:p10`), `?` placeholders consume positional binds in order, and
/// `??` is left untouched. Quoted string literals are skipped. The output
/// is for logs only and must never be executed.
pub fn debug_sql(sql: &str, binds: &Binds) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut positional = 0usize;
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '?' if chars.get(i + 1) == Some(&'?') => {
                out.push_str("??");
                i += 2;
            }
            '?' => {
                match binds.get_positional(positional) {
                    Some(value) => out.push_str(&value.to_sql_literal()),
                    None => out.push('?'),
                }
                positional += 1;
                i += 1;
            }
            ':' if chars.get(i + 1).is_some_and(|n| is_name_char(*n)) => {
                let start = i;
                i += 1;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                match binds.get(&name) {
                    Some(value) => out.push_str(&value.to_sql_literal()),
                    None => out.push_str(&name),
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
