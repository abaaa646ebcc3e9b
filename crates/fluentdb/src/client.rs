//! Connection contract consumed by the query engine.
//!
//! Drivers implement [`Connection`] and [`Statement`]; [`Pool`] resolves a
//! connection for a pool name and a [`QueryType`], which is how reads get
//! routed to replicas while writes stay on the primary.

use crate::error::DbResult;
use crate::param::Binds;
use crate::row::Row;
use serde::Deserialize;
use std::future::Future;

/// Read/write classification used to route a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Read,
    #[default]
    Write,
}

/// A prepared statement.
pub trait Statement: Send {
    /// Execute with the given binds. `Ok(false)` means the driver reported
    /// a failure without raising an error (see [`Statement::error_info`]).
    fn execute(&mut self, binds: &Binds) -> impl Future<Output = DbResult<bool>> + Send;

    /// Fetch the next row, `None` once exhausted.
    fn fetch(&mut self) -> impl Future<Output = DbResult<Option<Row>>> + Send;

    /// Fetch every remaining row.
    ///
    /// The default implementation loops over [`Statement::fetch`].
    fn fetch_all(&mut self) -> impl Future<Output = DbResult<Vec<Row>>> + Send {
        async move {
            let mut rows = Vec::new();
            while let Some(row) = self.fetch().await? {
                rows.push(row);
            }
            Ok(rows)
        }
    }

    /// Driver error message; `None` means success.
    fn error_info(&self) -> Option<String>;

    fn last_insert_id(&self) -> u64;

    /// Number of rows affected by the last execution.
    fn row_count(&self) -> u64;

    /// Number of output columns; zero for statements without a result set.
    fn column_count(&self) -> usize;

    fn sql(&self) -> &str;
}

/// A database connection able to prepare statements.
pub trait Connection: Send + Sync {
    type Statement: Statement;

    fn prepare(&self, sql: &str) -> impl Future<Output = DbResult<Self::Statement>> + Send;

    /// Whether a transaction is currently open on this connection.
    fn in_transaction(&self) -> bool;

    /// Table prefix configured for this connection.
    fn table_prefix(&self) -> &str {
        ""
    }
}

/// Resolves connections by pool name and classification.
pub trait Pool: Send + Sync {
    type Connection: Connection + Clone;

    fn get(
        &self,
        pool_name: Option<&str>,
        query_type: QueryType,
    ) -> impl Future<Output = DbResult<Self::Connection>> + Send;

    /// Table prefix configured for the pool. Defaults to none.
    fn table_prefix(&self, pool_name: Option<&str>, query_type: QueryType) -> String {
        let _ = (pool_name, query_type);
        String::new()
    }
}

/// A pool that always hands out the same connection.
#[derive(Debug, Clone)]
pub struct FixedPool<C> {
    conn: C,
}

impl<C> FixedPool<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }
}

impl<C: Connection + Clone> Pool for FixedPool<C> {
    type Connection = C;

    fn get(
        &self,
        _pool_name: Option<&str>,
        _query_type: QueryType,
    ) -> impl Future<Output = DbResult<C>> + Send {
        let conn = self.conn.clone();
        async move { Ok(conn) }
    }

    fn table_prefix(&self, _pool_name: Option<&str>, _query_type: QueryType) -> String {
        self.conn.table_prefix().to_string()
    }
}
