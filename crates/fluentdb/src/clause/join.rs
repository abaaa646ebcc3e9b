use super::{BuildContext, Fragment, Predicate, Raw, Table};
use crate::error::DbResult;

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinType {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Cross => "cross",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    On {
        join_type: JoinType,
        table: Table,
        left: String,
        operation: String,
        right: String,
        /// Extra condition appended after the `on` comparison.
        condition: Option<Predicate>,
    },
    Raw(Raw),
}

impl Join {
    pub fn render(&self, ctx: &mut BuildContext<'_>) -> DbResult<Fragment> {
        match self {
            Join::Raw(raw) => Ok(raw.to_fragment()),
            Join::On {
                join_type,
                table,
                left,
                operation,
                right,
                condition,
            } => {
                let mut frag =
                    Fragment::new(format!("{} join {}", join_type.as_str(), table.to_sql()));
                if !left.is_empty() {
                    frag.sql.push_str(" on ");
                    frag.sql.push_str(&ctx.quote_field(left));
                    frag.sql.push_str(operation);
                    frag.sql.push_str(&ctx.quote_field(right));
                }
                if let Some(condition) = condition {
                    let cond = condition.render(ctx)?;
                    frag.sql.push(' ');
                    frag.sql.push_str(&cond.sql);
                    frag.binds.merge(cond.binds);
                }
                Ok(frag)
            }
        }
    }
}
