//! Fluent query front-end.
//!
//! A [`Query`] collects clauses into its [`QueryOptions`], renders them with a
//! fresh [`Builder`](crate::builder::Builder) and executes the statement on a
//! connection resolved from its [`Pool`]. Every terminal operation resets the
//! query afterwards, successful or not, so one instance can be reused:
//!
//! ```ignore
//! use fluentdb::prelude::*;
//!
//! let mut query = Query::new(pool);
//! let rows = query
//!     .table("article")
//!     .and_where("member_id", "=", 1)
//!     .order("id", SortDir::Desc)
//!     .limit(10)
//!     .select()
//!     .await?
//!     .into_rows()?;
//!
//! // The same instance is clean again.
//! let total = query.table("article").count("*").await?;
//! ```

mod build;
mod exec;

pub use exec::StatementOf;

use crate::clause::{
    Field, FullTextOptions, Group, Join, JoinType, LockMode, LogicalOperator, Operand, Order,
    Partition, Predicate, Raw, SortDir, Table, WhereCollector, WhereGroup,
};
use crate::client::{Connection, FixedPool, Pool, QueryType};
use crate::config::{QueryConfig, SqlLogConfig};
use crate::error::DbResult;
use crate::options::{QueryOptions, SaveData, SaveValue};
use crate::param::{BindKey, Binds};
use crate::value::Value;
use std::sync::Arc;

/// Clause mutations deferred until the next build.
#[derive(Debug, Clone)]
enum BeforeBuild {
    /// Select the full-text score, optionally under an alias.
    ScoreField {
        options: Box<FullTextOptions>,
        alias: Option<String>,
    },
    /// Order by the full-text score, by alias when one is selected.
    ScoreOrder {
        options: Box<FullTextOptions>,
        alias: Option<String>,
        direction: SortDir,
    },
}

/// A reusable, fluent query bound to a connection pool.
pub struct Query<P: Pool> {
    pool: Arc<P>,
    pool_name: Option<String>,
    /// Injected connection; when `None` one is resolved per statement.
    db: Option<P::Connection>,
    query_type: QueryType,
    is_init_query_type: bool,
    origin_prefix: String,
    options: QueryOptions,
    binds: Binds,
    param_inc: u32,
    before_build: Vec<BeforeBuild>,
    log: SqlLogConfig,
}

impl<P: Pool> Query<P> {
    /// Create a query on the pool's default connection.
    pub fn new(pool: Arc<P>) -> Self {
        Self::with_config(pool, QueryConfig::default())
    }

    pub fn with_config(pool: Arc<P>, config: QueryConfig) -> Self {
        let query_type = config.query_type.unwrap_or_default();
        let origin_prefix = config.table_prefix.unwrap_or_else(|| {
            pool.table_prefix(config.pool_name.as_deref(), query_type)
        });
        Self {
            options: QueryOptions::new(origin_prefix.clone()),
            pool,
            pool_name: config.pool_name,
            db: None,
            query_type,
            is_init_query_type: config.query_type.is_some(),
            origin_prefix,
            binds: Binds::new(),
            param_inc: 0,
            before_build: Vec::new(),
            log: config.log,
        }
    }

    pub fn pool_name(&self) -> Option<&str> {
        self.pool_name.as_deref()
    }

    /// Current classification.
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    /// Replace the options wholesale. Resets the parameter counter.
    pub fn set_options(&mut self, options: QueryOptions) -> &mut Self {
        self.param_inc = 0;
        self.options = options;
        self
    }

    /// Binds collected so far, including those generated by the last build.
    pub fn binds(&self) -> &Binds {
        &self.binds
    }

    /// Connection the next statement runs on.
    pub async fn connection(&self) -> DbResult<P::Connection> {
        match &self.db {
            Some(db) => Ok(db.clone()),
            None => {
                self.pool
                    .get(self.pool_name.as_deref(), self.query_type)
                    .await
            }
        }
    }

    /// Return to the freshly constructed state.
    pub(crate) fn reset(&mut self) {
        self.param_inc = 0;
        if !self.is_init_query_type {
            self.query_type = QueryType::Write;
        }
        self.options = QueryOptions::new(self.origin_prefix.clone());
        self.binds.clear();
        self.before_build.clear();
    }

    // ── table ──

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.options.table.set_table(table, None, None);
        self
    }

    /// Table with an alias, optionally in another database.
    pub fn from(
        &mut self,
        table: impl Into<String>,
        alias: Option<&str>,
        database: Option<&str>,
    ) -> &mut Self {
        self.options.table.set_table(
            table,
            alias.map(str::to_string),
            database.map(str::to_string),
        );
        self
    }

    /// Raw table expression, e.g. a derived table.
    pub fn table_raw(&mut self, sql: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.options.table.set_raw(sql, alias.map(str::to_string));
        self
    }

    pub fn table_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.options.table.set_prefix(prefix);
        self
    }

    pub fn database(&mut self, database: impl Into<String>) -> &mut Self {
        self.options.table.set_database(Some(database.into()));
        self
    }

    pub fn partition<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.partition =
            Some(Partition::Names(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn partition_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.options.partition = Some(Partition::Raw(sql.into()));
        self
    }

    // ── fields ──

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.options.distinct = distinct;
        self
    }

    /// Add a field: `"name"`, `"t.name"` or `"t.name as alias"`.
    pub fn field(&mut self, field: &str) -> &mut Self {
        self.options.fields.push(Field::parse(field));
        self
    }

    pub fn fields(&mut self, fields: &[&str]) -> &mut Self {
        self.options.fields.extend(fields.iter().map(|f| Field::parse(f)));
        self
    }

    pub fn field_raw(&mut self, sql: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.options
            .fields
            .push(Field::raw(Raw::new(sql), alias.map(str::to_string)));
        self
    }

    pub fn field_raw_with(
        &mut self,
        sql: impl Into<String>,
        alias: Option<&str>,
        binds: impl Into<Binds>,
    ) -> &mut Self {
        self.options
            .fields
            .push(Field::raw(Raw::with_binds(sql, binds), alias.map(str::to_string)));
        self
    }

    // ── joins ──

    /// `inner join table on left op right`. The table text may carry an alias.
    pub fn join(&mut self, table: &str, left: &str, operation: &str, right: &str) -> &mut Self {
        self.join_with(JoinType::Inner, table, left, operation, right, None)
    }

    pub fn left_join(
        &mut self,
        table: &str,
        left: &str,
        operation: &str,
        right: &str,
    ) -> &mut Self {
        self.join_with(JoinType::Left, table, left, operation, right, None)
    }

    pub fn right_join(
        &mut self,
        table: &str,
        left: &str,
        operation: &str,
        right: &str,
    ) -> &mut Self {
        self.join_with(JoinType::Right, table, left, operation, right, None)
    }

    pub fn cross_join(
        &mut self,
        table: &str,
        left: &str,
        operation: &str,
        right: &str,
    ) -> &mut Self {
        self.join_with(JoinType::Cross, table, left, operation, right, None)
    }

    /// Join with an extra condition appended after the `on` comparison.
    pub fn join_with(
        &mut self,
        join_type: JoinType,
        table: &str,
        left: &str,
        operation: &str,
        right: &str,
        condition: Option<Predicate>,
    ) -> &mut Self {
        let mut join_table = Table::parse(table);
        join_table.set_prefix(self.origin_prefix.clone());
        self.options.joins.push(Join::On {
            join_type,
            table: join_table,
            left: left.to_string(),
            operation: operation.to_string(),
            right: right.to_string(),
            condition,
        });
        self
    }

    pub fn join_raw(&mut self, sql: impl Into<String>, binds: impl Into<Binds>) -> &mut Self {
        self.options.joins.push(Join::Raw(Raw::with_binds(sql, binds)));
        self
    }

    // ── order / group / having ──

    pub fn order(&mut self, field: impl Into<String>, direction: SortDir) -> &mut Self {
        self.options.orders.push(Order::new(field, direction));
        self
    }

    pub fn order_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.options.orders.push(Order::raw(Raw::new(sql)));
        self
    }

    pub fn order_raw_with(&mut self, sql: impl Into<String>, binds: impl Into<Binds>) -> &mut Self {
        self.options.orders.push(Order::raw(Raw::with_binds(sql, binds)));
        self
    }

    pub fn group(&mut self, field: impl Into<String>) -> &mut Self {
        self.options.groups.push(Group::Column(field.into()));
        self
    }

    pub fn group_raw(&mut self, sql: impl Into<String>, binds: impl Into<Binds>) -> &mut Self {
        self.options.groups.push(Group::Raw(Raw::with_binds(sql, binds)));
        self
    }

    pub fn having(
        &mut self,
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.options
            .havings
            .push(Predicate::new(field, operation, value, LogicalOperator::And));
        self
    }

    pub fn or_having(
        &mut self,
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.options
            .havings
            .push(Predicate::new(field, operation, value, LogicalOperator::Or));
        self
    }

    pub fn having_raw(
        &mut self,
        sql: impl Into<String>,
        logic: LogicalOperator,
        binds: impl Into<Binds>,
    ) -> &mut Self {
        self.options
            .havings
            .push(Predicate::raw(Raw::with_binds(sql, binds), logic));
        self
    }

    pub fn having_brackets<F>(&mut self, build: F, logic: LogicalOperator) -> &mut Self
    where
        F: FnOnce(&mut WhereGroup),
    {
        let mut group = WhereGroup::new();
        build(&mut group);
        self.options
            .havings
            .push(Predicate::brackets(group.into_items(), logic));
        self
    }

    // ── limits ──

    /// 1-based page of `size` rows.
    /// Saturates instead of overflowing; use [`Pagination`](crate::Pagination) to reject.
    pub fn page(&mut self, page: i64, size: i64) -> &mut Self {
        self.options.offset = Some(page.saturating_sub(1).saturating_mul(size));
        self.options.limit = Some(size);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.options.offset = Some(offset);
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn lock(&mut self, lock: LockMode) -> &mut Self {
        self.options.lock = Some(lock);
        self
    }

    // ── save data ──

    pub fn set_data(&mut self, data: SaveData) -> &mut Self {
        self.options.save_data = data;
        self
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.options
            .save_data
            .insert(field, SaveValue::Value(value.into()));
        self
    }

    /// Write an SQL expression instead of a value.
    pub fn set_field_exp(
        &mut self,
        field: impl Into<String>,
        exp: impl Into<String>,
        binds: impl Into<Binds>,
    ) -> &mut Self {
        self.options
            .save_data
            .insert(field, SaveValue::Raw(Raw::with_binds(exp, binds)));
        self
    }

    /// `field = field + :fipN`
    pub fn set_field_inc(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.options
            .save_data
            .insert(field, SaveValue::Increment(value.into()));
        self
    }

    /// `field = field - :fdpN`
    pub fn set_field_dec(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.options
            .save_data
            .insert(field, SaveValue::Decrement(value.into()));
        self
    }

    // ── binds ──

    pub fn bind_value(&mut self, key: impl Into<BindKey>, value: impl Into<Value>) -> &mut Self {
        self.binds.insert(key.into(), value.into());
        self
    }

    pub fn bind_values(&mut self, binds: Binds) -> &mut Self {
        self.binds.merge(binds);
        self
    }

    // ── full text ──

    /// Full-text search with default options.
    pub fn full_text(&mut self, fields: &[&str], search_text: impl Into<String>) -> &mut Self {
        self.full_text_options(fields, search_text, FullTextOptions::default())
    }

    /// Full-text search.
    ///
    /// Adds the `MATCH ... AGAINST` condition unless `where_logic` is
    /// `None`; a score field and score ordering are added right before the
    /// next build.
    pub fn full_text_options(
        &mut self,
        fields: &[&str],
        search_text: impl Into<String>,
        mut options: FullTextOptions,
    ) -> &mut Self {
        options.set_target(
            fields.iter().map(|f| f.to_string()).collect(),
            search_text.into(),
        );

        if let Some(logic) = options.where_logic {
            self.options
                .wheres
                .push(Predicate::full_text(options.clone(), logic));
        }

        let alias = options
            .score_field_name
            .clone()
            .filter(|name| !name.is_empty());
        if options.score_field_name.is_some() {
            self.before_build.push(BeforeBuild::ScoreField {
                options: Box::new(options.clone()),
                alias: alias.clone(),
            });
        }
        if let Some(direction) = options.order_direction {
            self.before_build.push(BeforeBuild::ScoreOrder {
                options: Box::new(options),
                alias,
                direction,
            });
        }
        self
    }
}

impl<C: Connection + Clone> Query<FixedPool<C>> {
    /// Create a query pinned to one connection, e.g. inside a transaction.
    pub fn with_connection(conn: C) -> Self {
        Self::with_connection_config(conn, QueryConfig::default())
    }

    pub fn with_connection_config(conn: C, mut config: QueryConfig) -> Self {
        if config.table_prefix.is_none() {
            config.table_prefix = Some(conn.table_prefix().to_string());
        }
        let mut query = Self::with_config(Arc::new(FixedPool::new(conn.clone())), config);
        query.db = Some(conn);
        query
    }
}

impl<P: Pool> Clone for Query<P> {
    /// Deep-copies the options and binds; the parameter counter restarts.
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            pool_name: self.pool_name.clone(),
            db: self.db.clone(),
            query_type: self.query_type,
            is_init_query_type: self.is_init_query_type,
            origin_prefix: self.origin_prefix.clone(),
            options: self.options.clone(),
            binds: self.binds.clone(),
            param_inc: 0,
            before_build: self.before_build.clone(),
            log: self.log.clone(),
        }
    }
}

impl<P: Pool> WhereCollector for Query<P> {
    fn push_where(&mut self, predicate: Predicate) -> &mut Self {
        self.options.wheres.push(predicate);
        self
    }
}
