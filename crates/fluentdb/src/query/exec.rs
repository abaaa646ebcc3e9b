use super::Query;
use crate::clause::{Field, Raw, SortDir};
use crate::client::{Connection, Pool, QueryType, Statement};
use crate::error::{DbError, DbResult};
use crate::ident;
use crate::log::log_statement;
use crate::options::SaveData;
use crate::pagination::{PaginateOptions, PaginateResult, Pagination};
use crate::result::{ChunkById, ChunkByOffset, CursorResult, QueryResult};
use crate::row::{FromRow, Row};
use crate::value::Value;
use indexmap::IndexMap;

/// Statement type produced by a pool's connections.
pub type StatementOf<P> = <<P as Pool>::Connection as Connection>::Statement;

impl<P: Pool> Query<P> {
    // ── core ──

    /// Execute literal SQL with the binds collected so far.
    pub async fn execute(&mut self, sql: &str) -> DbResult<QueryResult> {
        self.finish(Ok(sql.to_string())).await
    }

    /// Run `sql` (or pass its build error through), then reset.
    async fn finish(&mut self, sql: DbResult<String>) -> DbResult<QueryResult> {
        let outcome = match sql {
            Ok(sql) => self.run(&sql).await,
            Err(e) => Err(e),
        };
        self.reset();
        outcome
    }

    async fn run(&mut self, sql: &str) -> DbResult<QueryResult> {
        let (mut statement, executed) = self.execute_statement(sql).await?;
        QueryResult::from_statement(&mut statement, executed).await
    }

    async fn execute_statement(&mut self, sql: &str) -> DbResult<(StatementOf<P>, bool)> {
        let conn = self.connection().await?;
        let binds = std::mem::take(&mut self.binds);
        log_statement(
            &self.log,
            self.query_type,
            self.pool_name.as_deref(),
            sql,
            &binds,
        );
        let mut statement = conn.prepare(sql).await?;
        let executed = statement.execute(&binds).await?;
        Ok((statement, executed))
    }

    /// Build the select and switch unpinned, non-transactional queries to
    /// the read route.
    pub(super) async fn routed_select_sql(&mut self) -> DbResult<String> {
        let sql = self.build_select_sql()?;
        if !self.is_init_query_type {
            let in_transaction = match self.query_type {
                QueryType::Write => self.connection().await?.in_transaction(),
                QueryType::Read => false,
            };
            if !in_transaction {
                self.query_type = QueryType::Read;
            }
        }
        Ok(sql)
    }

    // ── reads ──

    pub async fn select(&mut self) -> DbResult<QueryResult> {
        let sql = self.routed_select_sql().await;
        self.finish(sql).await
    }

    /// First matching row.
    pub async fn find(&mut self) -> DbResult<Option<Row>> {
        let result = self.limit(1).select().await?;
        Ok(result.get()?.cloned())
    }

    pub async fn find_as<T: FromRow>(&mut self) -> DbResult<Option<T>> {
        self.limit(1).select().await?.get_as()
    }

    /// A single column of the first row, or `default` when it is missing or
    /// `NULL`.
    pub async fn value(&mut self, field: &str, default: impl Into<Value>) -> DbResult<Value> {
        let key = result_key(field);
        let result = self.limit(1).field(field).select().await?;
        Ok(match result.get_scalar(key)? {
            Some(value) if !value.is_null() => value,
            _ => default.into(),
        })
    }

    /// Values of one column across all rows.
    pub async fn column(&mut self, field: &str) -> DbResult<Vec<Value>> {
        let key = result_key(field);
        self.field(field).select().await?.get_column(key)
    }

    /// Values of one column keyed by the text of another.
    pub async fn column_keyed(
        &mut self,
        field: &str,
        key: &str,
    ) -> DbResult<IndexMap<String, Value>> {
        let value_column = result_key(field);
        let key_column = result_key(key);
        self.field(field);
        if key != field {
            self.field(key);
        }
        let rows = self.select().await?.into_rows()?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let key = row.get(&key_column)?.to_string();
                let value = row.get(&value_column)?.clone();
                Some((key, value))
            })
            .collect())
    }

    /// Execute the select and stream rows from the live statement.
    pub async fn cursor(&mut self) -> DbResult<CursorResult<StatementOf<P>>> {
        let outcome = match self.routed_select_sql().await {
            Ok(sql) => self
                .execute_statement(&sql)
                .await
                .map(|(statement, executed)| CursorResult::new(statement, executed)),
            Err(e) => Err(e),
        };
        self.reset();
        outcome
    }

    /// Iterate in chunks of `count` rows, seeking on `column`.
    ///
    /// `alias` names the column in the fetched rows and defaults to the
    /// column's own name. Any ordering already set is dropped.
    pub fn chunk_by_id(
        &mut self,
        count: i64,
        column: &str,
        alias: Option<&str>,
        direction: SortDir,
    ) -> ChunkById<P> {
        let query = self.clone();
        self.reset();
        let alias = alias.map_or_else(|| result_key(column), str::to_string);
        ChunkById::new(query, count, column.to_string(), alias, direction)
    }

    /// Iterate in chunks of `count` rows using `limit`/`offset`.
    pub fn chunk_by_offset(&mut self, count: i64) -> ChunkByOffset<P> {
        let query = self.clone();
        self.reset();
        ChunkByOffset::new(query, count)
    }

    /// One page of rows, plus the total row count unless disabled.
    pub async fn paginate(
        &mut self,
        page: i64,
        page_size: i64,
        options: PaginateOptions,
    ) -> DbResult<PaginateResult> {
        let pagination = match Pagination::new(page, page_size) {
            Ok(pagination) => pagination,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };

        let total = if options.total {
            let mut count_query = self.clone();
            match count_query
                .count_rows(options.count_field.as_deref())
                .await
            {
                Ok(total) => Some(total),
                Err(e) => {
                    self.reset();
                    return Err(e);
                }
            }
        } else {
            None
        };
        tracing::trace!(target: "fluentdb.paginate", page, page_size, ?total, "paginate");

        let result = self
            .offset(pagination.offset())
            .limit(pagination.limit())
            .select()
            .await?;
        PaginateResult::from_result(result, &pagination, total)
    }

    /// Row count for pagination, ignoring ordering.
    pub(crate) async fn count_rows(&mut self, count_field: Option<&str>) -> DbResult<i64> {
        self.options.orders.clear();
        if let Some(count_field) = count_field {
            self.options.fields = vec![Field::wrap(
                "count(",
                vec![Field::raw(Raw::new(count_field), None)],
                ")",
            )];
        } else if self.options.distinct {
            let fields = std::mem::take(&mut self.options.fields);
            self.options.distinct = false;
            self.options.fields = vec![Field::wrap("count(distinct ", fields, ")")];
        } else {
            return self.count("*").await;
        }
        let total = self.select().await?.get_scalar(0usize)?;
        Ok(total.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    // ── aggregates ──

    /// `count(field)`; `NULL` counts as zero.
    pub async fn count(&mut self, field: &str) -> DbResult<i64> {
        let value = self.aggregate("count", field).await?;
        Ok(value.as_i64().unwrap_or(0))
    }

    pub async fn sum(&mut self, field: &str) -> DbResult<Value> {
        self.aggregate("sum", field).await
    }

    pub async fn avg(&mut self, field: &str) -> DbResult<Value> {
        self.aggregate("avg", field).await
    }

    pub async fn min(&mut self, field: &str) -> DbResult<Value> {
        self.aggregate("min", field).await
    }

    pub async fn max(&mut self, field: &str) -> DbResult<Value> {
        self.aggregate("max", field).await
    }

    /// Replace the field list with `function(field)` and return the first
    /// column of the first row.
    pub async fn aggregate(&mut self, function: &str, field: &str) -> DbResult<Value> {
        let expression = format!("{function}({})", ident::quote_field(field));
        self.options.fields = vec![Field::raw(Raw::new(expression), None)];
        let value = self.select().await?.get_scalar(0usize)?;
        Ok(value.unwrap_or_default())
    }

    // ── writes ──

    pub async fn insert(&mut self, data: Option<&SaveData>) -> DbResult<QueryResult> {
        let sql = self.build_insert_sql(data);
        self.finish(sql).await
    }

    pub async fn batch_insert(&mut self, rows: &[SaveData]) -> DbResult<QueryResult> {
        if rows.is_empty() {
            self.reset();
            return Err(DbError::invalid_argument("batch insert requires at least one row"));
        }
        let sql = self.build_batch_insert_sql(rows);
        self.finish(sql).await
    }

    pub async fn update(&mut self, data: Option<&SaveData>) -> DbResult<QueryResult> {
        let sql = self.build_update_sql(data);
        self.finish(sql).await
    }

    pub async fn replace(&mut self, data: Option<&SaveData>) -> DbResult<QueryResult> {
        let sql = self.build_replace_sql(data);
        self.finish(sql).await
    }

    pub async fn delete(&mut self) -> DbResult<QueryResult> {
        let sql = self.build_delete_sql();
        self.finish(sql).await
    }
}

fn result_key(field: &str) -> String {
    Field::parse(field)
        .result_key()
        .unwrap_or_else(|| field.to_string())
}
