//! Clause model: the fragments a query is assembled from.
//!
//! Every clause is a tagged enum with a structured and a raw form. Clauses
//! render through a [`BuildContext`], which owns the parameter counter so
//! generated placeholder names stay unique across the whole statement.

mod collector;
mod field;
mod full_text;
mod join;
mod order;
mod partition;
mod predicate;
mod table;

pub use collector::{WhereCollector, WhereGroup};
pub use field::Field;
pub use full_text::{FullTextOptions, SearchModifier};
pub use join::{Join, JoinType};
pub use order::{Group, Order, SortDir};
pub use partition::Partition;
pub use predicate::{Operand, Predicate, PredicateKind};
pub use table::Table;

pub(crate) use field::render_fields;
pub(crate) use predicate::render_predicates;

use crate::ident;
use crate::param::Binds;
use std::fmt;
use std::str::FromStr;

/// Rendering state shared by every clause of one statement.
#[derive(Debug)]
pub struct BuildContext<'a> {
    param_inc: &'a mut u32,
}

impl<'a> BuildContext<'a> {
    pub fn new(param_inc: &'a mut u32) -> Self {
        Self { param_inc }
    }

    /// Next generated placeholder, `:p` + hex counter.
    pub fn param_name(&mut self) -> String {
        self.param_name_with(":p")
    }

    /// Next generated placeholder with a custom prefix.
    pub fn param_name_with(&mut self, prefix: &str) -> String {
        next_param_name(self.param_inc, prefix)
    }

    pub fn quote_field(&self, field: &str) -> String {
        ident::quote_field(field)
    }

    pub fn quote_name(&self, name: &str) -> String {
        ident::quote_name(name)
    }
}

fn next_param_name(counter: &mut u32, prefix: &str) -> String {
    *counter += 1;
    format!("{prefix}{:x}", *counter)
}

/// Rendered SQL text plus the binds it introduced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub binds: Binds,
}

impl Fragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Binds::new(),
        }
    }

    pub fn with_binds(sql: impl Into<String>, binds: Binds) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Literal SQL with its own binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Raw {
    pub sql: String,
    pub binds: Binds,
}

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Binds::new(),
        }
    }

    pub fn with_binds(sql: impl Into<String>, binds: impl Into<Binds>) -> Self {
        Self {
            sql: sql.into(),
            binds: binds.into(),
        }
    }

    pub(crate) fn to_fragment(&self) -> Fragment {
        Fragment::with_binds(self.sql.clone(), self.binds.clone())
    }
}

/// Operator linking a predicate to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
    Xor,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "xor" => Ok(Self::Xor),
            _ => Err(()),
        }
    }
}

/// Row lock appended to a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockMode {
    ForUpdate,
    Shared,
    Raw(String),
}

impl LockMode {
    pub(crate) fn render(&self) -> String {
        match self {
            Self::ForUpdate => " for update".to_string(),
            Self::Shared => " lock in share mode".to_string(),
            Self::Raw(sql) => format!(" {sql}"),
        }
    }
}
