use super::{BuildContext, Fragment, FullTextOptions, LogicalOperator, Raw};
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
    /// Inlined verbatim; for `in` it is wrapped in parentheses.
    Raw(Raw),
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(v.into())
                }
            }
        )*
    };
}

impl_operand_from_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, &String,
    Value
);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Operand {
    fn from(values: &[T]) -> Self {
        Operand::List(values.iter().cloned().map(Into::into).collect())
    }
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<serde_json::Value> for Operand {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Array(items) => {
                Operand::List(items.into_iter().map(Value::from).collect())
            }
            other => Operand::Value(other.into()),
        }
    }
}

/// A where/having condition and the operator linking it to its predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub logic: LogicalOperator,
    pub kind: PredicateKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateKind {
    Compare {
        field: String,
        operation: String,
        value: Operand,
    },
    Raw(Raw),
    /// Nested list rendered inside parentheses.
    Brackets(Vec<Predicate>),
    /// Literal SQL rendered inside parentheses.
    BracketsRaw(Raw),
    /// JSON condition object, see [`WhereCollector::where_ex`](super::WhereCollector::where_ex).
    Ex(serde_json::Value),
    FullText(Box<FullTextOptions>),
}

impl Predicate {
    pub fn new(
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Operand>,
        logic: LogicalOperator,
    ) -> Self {
        Self {
            logic,
            kind: PredicateKind::Compare {
                field: field.into(),
                operation: operation.into(),
                value: value.into(),
            },
        }
    }

    pub fn raw(raw: Raw, logic: LogicalOperator) -> Self {
        Self {
            logic,
            kind: PredicateKind::Raw(raw),
        }
    }

    pub fn brackets(items: Vec<Predicate>, logic: LogicalOperator) -> Self {
        Self {
            logic,
            kind: PredicateKind::Brackets(items),
        }
    }

    pub fn brackets_raw(raw: Raw, logic: LogicalOperator) -> Self {
        Self {
            logic,
            kind: PredicateKind::BracketsRaw(raw),
        }
    }

    pub fn ex(condition: serde_json::Value, logic: LogicalOperator) -> Self {
        Self {
            logic,
            kind: PredicateKind::Ex(condition),
        }
    }

    pub fn full_text(options: FullTextOptions, logic: LogicalOperator) -> Self {
        Self {
            logic,
            kind: PredicateKind::FullText(Box::new(options)),
        }
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.logic
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.kind, PredicateKind::Raw(_) | PredicateKind::BracketsRaw(_))
    }

    /// `"<logic> <body>"`.
    pub fn render(&self, ctx: &mut BuildContext<'_>) -> DbResult<Fragment> {
        let mut frag = self.render_without_logic(ctx)?;
        frag.sql = format!("{} {}", self.logic, frag.sql);
        Ok(frag)
    }

    /// Body only, without the leading operator.
    pub fn render_without_logic(&self, ctx: &mut BuildContext<'_>) -> DbResult<Fragment> {
        match &self.kind {
            PredicateKind::Compare {
                field,
                operation,
                value,
            } => render_compare(field, operation, value, ctx),
            PredicateKind::Raw(raw) => Ok(raw.to_fragment()),
            PredicateKind::Brackets(items) => Ok(wrap(render_predicates(items, ctx)?)),
            PredicateKind::BracketsRaw(raw) => {
                Ok(Fragment::with_binds(format!("({})", raw.sql), raw.binds.clone()))
            }
            PredicateKind::Ex(condition) => {
                let items = ex_predicates(condition)?;
                Ok(wrap(render_predicates(&items, ctx)?))
            }
            PredicateKind::FullText(options) => Ok(options.render_condition(ctx)),
        }
    }
}

fn wrap(inner: Fragment) -> Fragment {
    if inner.is_empty() {
        return inner;
    }
    Fragment::with_binds(format!("({})", inner.sql), inner.binds)
}

fn render_compare(
    field: &str,
    operation: &str,
    value: &Operand,
    ctx: &mut BuildContext<'_>,
) -> DbResult<Fragment> {
    let field_sql = ctx.quote_field(field);
    let mut frag = Fragment::default();

    match operation.to_ascii_lowercase().as_str() {
        "between" | "not between" => {
            let Operand::List(values) = value else {
                return Err(DbError::invalid_argument(format!(
                    "{operation} requires a [min, max] pair"
                )));
            };
            let [lo, hi] = values.as_slice() else {
                return Err(DbError::invalid_argument(format!(
                    "{operation} requires exactly 2 values, got {}",
                    values.len()
                )));
            };
            let lo_name = ctx.param_name();
            let hi_name = ctx.param_name();
            frag.sql = format!("{field_sql} {operation} {lo_name} and {hi_name}");
            frag.binds.set(lo_name, lo.clone());
            frag.binds.set(hi_name, hi.clone());
        }
        op @ ("in" | "not in") => match value {
            Operand::List(values) if values.is_empty() => {
                let tautology = if op == "in" { "(0 = 1)" } else { "(1 = 1)" };
                frag.sql = format!("{field_sql} {operation} {tautology}");
            }
            Operand::List(values) => {
                let mut names = Vec::with_capacity(values.len());
                for v in values {
                    let name = ctx.param_name();
                    frag.binds.set(name.clone(), v.clone());
                    names.push(name);
                }
                frag.sql = format!("{field_sql} {operation} ({})", names.join(","));
            }
            Operand::Raw(raw) => {
                frag.sql = format!("{field_sql} {operation} ({})", raw.sql);
                frag.binds = raw.binds.clone();
            }
            Operand::Value(_) => {
                return Err(DbError::invalid_argument(format!(
                    "{operation} requires a list of values"
                )));
            }
        },
        _ => match value {
            Operand::Raw(raw) => {
                frag.sql = format!("{field_sql} {operation} {}", raw.sql);
                frag.binds = raw.binds.clone();
            }
            Operand::Value(v) => {
                let name = ctx.param_name();
                frag.sql = format!("{field_sql} {operation} {name}");
                frag.binds.set(name, v.clone());
            }
            Operand::List(_) => {
                return Err(DbError::invalid_argument(format!(
                    "operator '{operation}' does not accept a list"
                )));
            }
        },
    }

    Ok(frag)
}

/// Render a predicate list: the first operator is dropped and empty bodies
/// are skipped. Returns an empty fragment when nothing renders.
pub(crate) fn render_predicates(
    items: &[Predicate],
    ctx: &mut BuildContext<'_>,
) -> DbResult<Fragment> {
    let mut out = Fragment::default();
    for item in items {
        let body = item.render_without_logic(ctx)?;
        if body.is_empty() {
            continue;
        }
        if !out.sql.is_empty() {
            out.sql.push(' ');
            out.sql.push_str(item.logic.as_str());
            out.sql.push(' ');
        }
        out.sql.push_str(&body.sql);
        out.binds.merge(body.binds);
    }
    Ok(out)
}

/// Expand a `where_ex` condition object into predicates.
///
/// `field: value` compares with `=`, `field: [op, value]` uses `op`, and the
/// keys `and`/`or`/`xor` hold nested objects rendered in brackets.
fn ex_predicates(condition: &serde_json::Value) -> DbResult<Vec<Predicate>> {
    let serde_json::Value::Object(map) = condition else {
        return Err(DbError::invalid_argument(
            "where_ex condition must be a JSON object",
        ));
    };

    let mut items = Vec::with_capacity(map.len());
    for (key, value) in map {
        if let Ok(logic) = key.parse::<LogicalOperator>() {
            items.push(Predicate::brackets(ex_predicates(value)?, logic));
            continue;
        }
        let predicate = match value {
            serde_json::Value::Array(pair) => {
                let [serde_json::Value::String(op), operand] = pair.as_slice() else {
                    return Err(DbError::invalid_argument(format!(
                        "where_ex value for '{key}' must be [operator, value]"
                    )));
                };
                Predicate::new(key, op, operand.clone(), LogicalOperator::And)
            }
            other => Predicate::new(key, "=", Value::from(other.clone()), LogicalOperator::And),
        };
        items.push(predicate);
    }
    Ok(items)
}
