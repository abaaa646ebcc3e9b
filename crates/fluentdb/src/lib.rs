//! # fluentdb
//!
//! A fluent MySQL-dialect query builder on top of an abstract connection layer.
//!
//! ## Features
//!
//! - **Fluent clauses**: tables, joins, where/having groups, JSON paths, full-text search
//! - **Named binds**: generated `:p1`, `:p2`, ... placeholders, raw fragments may carry their own
//! - **Reusable queries**: every terminal operation resets the query, success or failure
//! - **Read/write routing**: non-transactional selects resolve a read connection
//! - **Result streaming**: eager [`QueryResult`], forward-only [`CursorResult`], chunked
//!   iteration by id or offset
//! - **Pagination**: `limit`/`offset` pages and id-first [`BigTablePagination`]
//!
//! Drivers plug in by implementing [`Connection`], [`Statement`] and [`Pool`].
//!
//! ```ignore
//! use fluentdb::prelude::*;
//!
//! let mut query = Query::new(pool);
//!
//! // SELECT
//! let page = query
//!     .table("article")
//!     .and_where("member_id", "=", 1)
//!     .order("id", SortDir::Desc)
//!     .paginate(1, 20, PaginateOptions::default())
//!     .await?;
//!
//! // INSERT
//! let id = query
//!     .table("article")
//!     .insert(Some(&SaveData::new().set("title", "hello")))
//!     .await?
//!     .last_insert_id()?;
//!
//! // UPDATE
//! query
//!     .table("article")
//!     .and_where("id", "=", id)
//!     .set_field_inc("hits", 1)
//!     .update(None)
//!     .await?;
//!
//! // Chunked iteration
//! let chunks = query.table("article").chunk_by_id(500, "id", None, SortDir::Asc);
//! let mut rows = std::pin::pin!(chunks.each());
//! while let Some(row) = rows.try_next().await? {
//!     // ...
//! }
//! ```

pub mod builder;
pub mod clause;
pub mod client;
pub mod config;
pub mod debug;
pub mod error;
pub mod ident;
mod log;
pub mod options;
pub mod pagination;
pub mod param;
pub mod prelude;
pub mod query;
pub mod result;
pub mod row;
pub mod value;

pub use clause::{
    FullTextOptions, JoinType, LockMode, LogicalOperator, Operand, Predicate, Raw, SearchModifier,
    SortDir, WhereCollector, WhereGroup,
};
pub use client::{Connection, FixedPool, Pool, QueryType, Statement};
pub use config::{LogLevel, QueryConfig, SqlLogConfig};
pub use debug::debug_sql;
pub use error::{DbError, DbResult};
pub use options::{QueryOptions, SaveData, SaveValue};
pub use pagination::{BigTablePagination, PaginateOptions, PaginateResult, Pagination};
pub use param::{BindKey, Binds};
pub use query::{Query, StatementOf};
pub use result::{ChunkById, ChunkByOffset, ColumnRef, CursorResult, QueryResult};
pub use row::{FromRow, FromValue, Row};
pub use value::Value;
