//! Statement builder.
//!
//! A [`Builder`] is created fresh for every build. It walks a
//! [`QueryOptions`](crate::options::QueryOptions) snapshot, renders one
//! statement and collects every bind the visited clauses introduced.
//!
//! - Sections render to nothing when their source is empty and are joined
//!   with a single leading space.
//! - Placeholders are generated as `:p1`, `:p2`, ... `:pa`, `:pb` (hex).

mod delete;
mod insert;
mod select;
mod update;

use crate::clause::{
    BuildContext, Fragment, Group, Join, Order, Partition, Predicate, render_predicates,
};
use crate::error::DbResult;
use crate::param::Binds;

/// SQL text plus the binds generated while rendering it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSql {
    pub sql: String,
    pub binds: Binds,
}

/// Renders one statement from query options.
#[derive(Debug)]
pub struct Builder<'a> {
    ctx: BuildContext<'a>,
    binds: Binds,
}

impl<'a> Builder<'a> {
    /// Create a builder drawing placeholder numbers from `param_inc`.
    pub fn new(param_inc: &'a mut u32) -> Self {
        Self {
            ctx: BuildContext::new(param_inc),
            binds: Binds::new(),
        }
    }

    fn take(&mut self, frag: Fragment) -> String {
        self.binds.merge(frag.binds);
        frag.sql
    }

    fn finish(self, sql: String) -> BuiltSql {
        BuiltSql {
            sql,
            binds: self.binds,
        }
    }

    pub(crate) fn parse_partition(&mut self, partition: Option<&Partition>) -> String {
        partition
            .map(|p| p.render(&mut self.ctx))
            .unwrap_or_default()
    }

    pub(crate) fn parse_join(&mut self, joins: &[Join]) -> DbResult<String> {
        let mut out = String::new();
        for join in joins {
            let frag = join.render(&mut self.ctx)?;
            out.push(' ');
            out.push_str(&self.take(frag));
        }
        Ok(out)
    }

    pub(crate) fn parse_where(&mut self, wheres: &[Predicate]) -> DbResult<String> {
        self.parse_predicates(" where ", wheres)
    }

    pub(crate) fn parse_having(&mut self, havings: &[Predicate]) -> DbResult<String> {
        self.parse_predicates(" having ", havings)
    }

    fn parse_predicates(&mut self, keyword: &str, items: &[Predicate]) -> DbResult<String> {
        let frag = render_predicates(items, &mut self.ctx)?;
        if frag.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{keyword}{}", self.take(frag)))
    }

    pub(crate) fn parse_group(&mut self, groups: &[Group]) -> String {
        if groups.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = groups
            .iter()
            .map(|g| {
                let frag = g.render(&mut self.ctx);
                self.take(frag)
            })
            .collect();
        format!(" group by {}", parts.join(","))
    }

    pub(crate) fn parse_order(&mut self, orders: &[Order]) -> String {
        if orders.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = orders
            .iter()
            .map(|o| {
                let frag = o.render(&mut self.ctx);
                self.take(frag)
            })
            .collect();
        format!(" order by {}", parts.join(","))
    }

    /// `limit :lim` or `limit :off,:lim`; nothing without a limit.
    pub(crate) fn parse_limit(&mut self, offset: Option<i64>, limit: Option<i64>) -> String {
        let Some(limit) = limit else {
            return String::new();
        };
        match offset {
            None => {
                let name = self.ctx.param_name();
                self.binds.set(name.clone(), limit);
                format!(" limit {name}")
            }
            Some(offset) => {
                let offset_name = self.ctx.param_name();
                self.binds.set(offset_name.clone(), offset);
                let limit_name = self.ctx.param_name();
                self.binds.set(limit_name.clone(), limit);
                format!(" limit {offset_name},{limit_name}")
            }
        }
    }
}
