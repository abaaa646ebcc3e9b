use super::{BuildContext, Fragment, Raw};
use crate::ident;

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Column { name: String, alias: Option<String> },
    Raw { raw: Raw, alias: Option<String> },
    /// `prefix` + inner fields (or `*`) + `suffix`, e.g. `count(distinct ...)`.
    Wrap {
        prefix: String,
        fields: Vec<Field>,
        suffix: String,
    },
}

impl Field {
    /// Parse `"name"`, `"t.name alias"` or `"t.name as alias"`.
    pub fn parse(text: &str) -> Self {
        let kw = ident::parse_keyword_text(text);
        if kw.keywords.is_empty() {
            return Self::column(text.trim(), None);
        }
        Self::Column {
            name: kw.keywords.join("."),
            alias: kw.alias,
        }
    }

    pub fn column(name: impl Into<String>, alias: Option<String>) -> Self {
        Self::Column {
            name: name.into(),
            alias,
        }
    }

    pub fn raw(raw: Raw, alias: Option<String>) -> Self {
        Self::Raw { raw, alias }
    }

    pub fn wrap(prefix: impl Into<String>, fields: Vec<Field>, suffix: impl Into<String>) -> Self {
        Self::Wrap {
            prefix: prefix.into(),
            fields,
            suffix: suffix.into(),
        }
    }

    /// Key this field appears under in a fetched row.
    pub fn result_key(&self) -> Option<String> {
        match self {
            Self::Column { name, alias } => Some(
                alias
                    .clone()
                    .unwrap_or_else(|| name.rsplit('.').next().unwrap_or(name).to_string()),
            ),
            Self::Raw { raw, alias } => Some(alias.clone().unwrap_or_else(|| raw.sql.clone())),
            Self::Wrap { .. } => None,
        }
    }

    pub fn render(&self, ctx: &mut BuildContext<'_>) -> Fragment {
        match self {
            Self::Column { name, alias } => {
                let mut sql = ctx.quote_field(name);
                if let Some(alias) = alias {
                    sql.push_str(" as ");
                    sql.push_str(&ctx.quote_name(alias));
                }
                Fragment::new(sql)
            }
            Self::Raw { raw, alias } => match alias {
                Some(alias) => Fragment::with_binds(
                    format!("({}) as {}", raw.sql, ctx.quote_name(alias)),
                    raw.binds.clone(),
                ),
                None => raw.to_fragment(),
            },
            Self::Wrap {
                prefix,
                fields,
                suffix,
            } => {
                let inner = render_fields(fields, ctx);
                Fragment::with_binds(format!("{prefix}{}{suffix}", inner.sql), inner.binds)
            }
        }
    }
}

/// Render a select list; an empty list is `*`.
pub(crate) fn render_fields(fields: &[Field], ctx: &mut BuildContext<'_>) -> Fragment {
    if fields.is_empty() {
        return Fragment::new("*");
    }
    let mut out = Fragment::default();
    for (i, field) in fields.iter().enumerate() {
        let frag = field.render(ctx);
        if i > 0 {
            out.sql.push(',');
        }
        out.sql.push_str(&frag.sql);
        out.binds.merge(frag.binds);
    }
    out
}
