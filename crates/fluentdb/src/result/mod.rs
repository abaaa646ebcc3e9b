//! Statement results.
//!
//! - [`QueryResult`]: eager; every row is fetched when it is created
//! - [`CursorResult`]: lazy, forward-only, one row per fetch
//! - [`ChunkById`] / [`ChunkByOffset`]: one [`QueryResult`] per round trip

mod chunk;
mod cursor;

pub use chunk::{ChunkById, ChunkByOffset};
pub use cursor::CursorResult;

use crate::client::Statement;
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, Row};
use crate::value::Value;

/// Column addressed by name or by zero-based position in the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl Default for ColumnRef {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl ColumnRef {
    fn resolve<'a>(&'a self, row: &'a Row) -> Option<&'a str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(i) => row.column_name(*i),
        }
    }
}

/// Fully materialized result of one statement.
///
/// Every accessor except [`is_success`](Self::is_success), [`sql`](Self::sql)
/// and [`error`](Self::error) fails with
/// [`DbError::UnsuccessfulResult`] when the statement did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    success: bool,
    sql: String,
    error: Option<String>,
    last_insert_id: u64,
    affected_rows: u64,
    rows: Vec<Row>,
}

impl QueryResult {
    /// Capture an executed statement. Rows are fetched only for successful
    /// statements that produce a result set.
    pub async fn from_statement<S: Statement>(statement: &mut S, executed: bool) -> DbResult<Self> {
        let error = statement.error_info();
        let success = executed && error.is_none();
        let rows = if success && statement.column_count() > 0 {
            statement.fetch_all().await?
        } else {
            Vec::new()
        };
        Ok(Self {
            success,
            sql: statement.sql().to_string(),
            error,
            last_insert_id: statement.last_insert_id(),
            affected_rows: statement.row_count(),
            rows,
        })
    }

    /// A successful result holding `rows`.
    pub fn from_rows(sql: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            success: true,
            sql: sql.into(),
            error: None,
            last_insert_id: 0,
            affected_rows: 0,
            rows,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Driver error message of a failed statement.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn ensure_success(&self) -> DbResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(DbError::unsuccessful(self.sql.clone(), self.error.clone()))
        }
    }

    pub fn last_insert_id(&self) -> DbResult<u64> {
        self.ensure_success()?;
        Ok(self.last_insert_id)
    }

    pub fn affected_rows(&self) -> DbResult<u64> {
        self.ensure_success()?;
        Ok(self.affected_rows)
    }

    /// First row, if any.
    pub fn get(&self) -> DbResult<Option<&Row>> {
        self.ensure_success()?;
        Ok(self.rows.first())
    }

    pub fn get_as<T: FromRow>(&self) -> DbResult<Option<T>> {
        self.get()?.map(T::from_row).transpose()
    }

    pub fn get_array(&self) -> DbResult<&[Row]> {
        self.ensure_success()?;
        Ok(&self.rows)
    }

    pub fn get_array_as<T: FromRow>(&self) -> DbResult<Vec<T>> {
        self.get_array()?.iter().map(T::from_row).collect()
    }

    /// One column across all rows. Rows without the column are skipped.
    pub fn get_column(&self, column: impl Into<ColumnRef>) -> DbResult<Vec<Value>> {
        self.ensure_success()?;
        let column = column.into();
        let Some(name) = self.rows.first().and_then(|first| column.resolve(first)) else {
            return Ok(Vec::new());
        };
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(name).cloned())
            .collect())
    }

    /// One column of the first row.
    pub fn get_scalar(&self, column: impl Into<ColumnRef>) -> DbResult<Option<Value>> {
        self.ensure_success()?;
        let column = column.into();
        Ok(self.rows.first().and_then(|first| {
            column
                .resolve(first)
                .and_then(|name| first.get(name).cloned())
        }))
    }

    pub fn row_count(&self) -> DbResult<usize> {
        self.ensure_success()?;
        Ok(self.rows.len())
    }

    pub fn into_rows(self) -> DbResult<Vec<Row>> {
        self.ensure_success()?;
        Ok(self.rows)
    }
}
