//! Convenient imports for typical `fluentdb` usage.
//!
//! ```ignore
//! use fluentdb::prelude::*;
//! ```

pub use crate::{
    BigTablePagination, DbError, DbResult, FromRow, LogicalOperator, PaginateOptions, Query,
    QueryConfig, QueryResult, QueryType, Raw, Row, SaveData, SortDir, Value, WhereCollector,
};

pub use futures_util::TryStreamExt;
