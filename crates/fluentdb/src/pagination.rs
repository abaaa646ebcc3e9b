//! Page-based reads.
//!
//! [`Query::paginate`](crate::Query::paginate) pages with `limit`/`offset`.
//! [`BigTablePagination`] first pages over the id column only, then loads the
//! full rows of that page with `id in (...)`, keeping the page order through
//! `order by field(id, ...)`.

use crate::clause::WhereCollector;
use crate::client::Pool;
use crate::error::{DbError, DbResult};
use crate::ident;
use crate::param::Binds;
use crate::query::Query;
use crate::result::QueryResult;
use crate::row::Row;
use serde::Serialize;

/// 1-based page arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    size: i64,
    offset: i64,
}

impl Pagination {
    /// Returns error if `page < 1`, `size < 1` or the offset overflows `i64`.
    pub fn new(page: i64, size: i64) -> DbResult<Self> {
        if page < 1 {
            return Err(DbError::invalid_argument(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if size < 1 {
            return Err(DbError::invalid_argument(format!(
                "page size must be >= 1, got {size}"
            )));
        }
        let offset = (page - 1).checked_mul(size).ok_or_else(|| {
            DbError::invalid_argument(format!("page {page} of size {size} is out of range"))
        })?;
        Ok(Self { page, size, offset })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// `ceil(total / size)`
    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        total / self.size + i64::from(total % self.size != 0)
    }
}

/// Options for [`Query::paginate`](crate::Query::paginate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Run a count query for `total` and `page_count`.
    pub total: bool,
    /// Expression counted instead of `*`, e.g. `distinct member_id`.
    pub count_field: Option<String>,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            total: true,
            count_field: None,
        }
    }
}

impl PaginateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the count query.
    pub fn without_total(mut self) -> Self {
        self.total = false;
        self
    }

    pub fn with_count_field(mut self, field: impl Into<String>) -> Self {
        self.count_field = Some(field.into());
        self
    }
}

/// One page of rows.
///
/// Serializes as `{"list": [...], "limit": n, "total": n, "page_count": n}`;
/// `total` and `page_count` are omitted when the count was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginateResult {
    list: Vec<Row>,
    #[serde(skip)]
    offset: i64,
    limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_count: Option<i64>,
}

impl PaginateResult {
    pub fn new(list: Vec<Row>, pagination: &Pagination, total: Option<i64>) -> Self {
        Self {
            list,
            offset: pagination.offset(),
            limit: pagination.limit(),
            total,
            page_count: total.map(|total| pagination.page_count(total)),
        }
    }

    pub(crate) fn from_result(
        result: QueryResult,
        pagination: &Pagination,
        total: Option<i64>,
    ) -> DbResult<Self> {
        Ok(Self::new(result.into_rows()?, pagination, total))
    }

    pub fn list(&self) -> &[Row] {
        &self.list
    }

    pub fn into_list(self) -> Vec<Row> {
        self.list
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn total(&self) -> Option<i64> {
        self.total
    }

    pub fn page_count(&self) -> Option<i64> {
        self.page_count
    }

    pub fn to_json(&self) -> DbResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Two-step pagination for large tables.
///
/// The id page is read with `limit`/`offset` over the id column only; the
/// full rows are then fetched by id. With `clean_where` (the default) the
/// second query drops the original conditions since the ids already satisfy
/// them.
pub struct BigTablePagination<P: Pool> {
    query: Query<P>,
    id_field: String,
    clean_where: bool,
}

impl<P: Pool> BigTablePagination<P> {
    pub fn new(query: Query<P>) -> Self {
        Self {
            query,
            id_field: "id".to_string(),
            clean_where: true,
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_clean_where(mut self, clean_where: bool) -> Self {
        self.clean_where = clean_where;
        self
    }

    pub fn query(&self) -> &Query<P> {
        &self.query
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn is_clean_where(&self) -> bool {
        self.clean_where
    }

    /// Rows of one page, in id-page order.
    pub async fn select(&self, page: i64, page_size: i64) -> DbResult<QueryResult> {
        let pagination = Pagination::new(page, page_size)?;
        self.select_page(&pagination).await
    }

    pub async fn paginate(
        &self,
        page: i64,
        page_size: i64,
        options: PaginateOptions,
    ) -> DbResult<PaginateResult> {
        let pagination = Pagination::new(page, page_size)?;
        let total = if options.total {
            Some(self.query.clone().count_rows(None).await?)
        } else {
            None
        };
        let result = self.select_page(&pagination).await?;
        PaginateResult::from_result(result, &pagination, total)
    }

    async fn select_page(&self, pagination: &Pagination) -> DbResult<QueryResult> {
        let ids = self
            .query
            .clone()
            .field(&self.id_field)
            .offset(pagination.offset())
            .limit(pagination.limit())
            .select()
            .await?
            .get_column(0usize)?;
        tracing::trace!(
            target: "fluentdb.paginate",
            page = pagination.page(),
            ids = ids.len(),
            "big table id page"
        );

        let mut query = self.query.clone();
        let options = query.options_mut();
        options.orders.clear();
        if self.clean_where {
            options.wheres.clear();
        }

        if ids.is_empty() {
            return query.where_raw("1=2").select().await;
        }

        let names: Vec<String> = (0..ids.len()).map(|i| format!(":v{i}")).collect();
        let order = format!(
            "field({}, {})",
            ident::quote_field(&self.id_field),
            names.join(",")
        );
        let binds = Binds::from_named(names.into_iter().zip(ids.iter().cloned()));
        query
            .where_in(self.id_field.as_str(), ids)
            .order_raw_with(order, binds)
            .select()
            .await
    }
}
