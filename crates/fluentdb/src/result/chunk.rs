use super::QueryResult;
use crate::clause::{LogicalOperator, Predicate, SortDir, WhereCollector};
use crate::client::Pool;
use crate::error::{DbError, DbResult};
use crate::query::Query;
use crate::row::Row;
use crate::value::Value;
use futures_core::Stream;
use futures_util::TryStreamExt;

/// Keyset ("seek") chunking over a monotonic column.
///
/// The first round is a plain `limit`; later rounds add `column > last`
/// (`<` when descending), with `last` read from the `alias` column of the
/// previous round's last row. Iteration stops after a short round.
#[must_use]
pub struct ChunkById<P: Pool> {
    query: Query<P>,
    count: i64,
    column: String,
    alias: String,
    direction: SortDir,
    last: Option<Value>,
    finished: bool,
}

impl<P: Pool> ChunkById<P> {
    pub(crate) fn new(
        mut query: Query<P>,
        count: i64,
        column: String,
        alias: String,
        direction: SortDir,
    ) -> Self {
        let options = query.options_mut();
        options.orders.clear();
        // A trailing `and column > :last` must not bind to an `or` branch.
        if options.wheres.iter().skip(1).any(|w| w.logic != LogicalOperator::And) {
            let wheres = std::mem::take(&mut options.wheres);
            options
                .wheres
                .push(Predicate::brackets(wheres, LogicalOperator::And));
        }
        Self {
            query,
            count,
            column,
            alias,
            direction,
            last: None,
            finished: count < 1,
        }
    }

    /// Fetch the next chunk; `None` once the source is exhausted.
    pub async fn next_chunk(&mut self) -> DbResult<Option<QueryResult>> {
        if self.finished {
            return Ok(None);
        }

        let mut query = self.query.clone();
        if let Some(last) = &self.last {
            query.and_where(self.column.as_str(), self.direction.seek_operator(), last.clone());
        }
        let result = query
            .order(self.column.as_str(), self.direction)
            .limit(self.count)
            .select()
            .await?;

        let rows = result.get_array()?;
        tracing::trace!(
            target: "fluentdb.chunk",
            column = %self.column,
            after = ?self.last,
            rows = rows.len(),
            "chunk by id"
        );
        if (rows.len() as i64) < self.count {
            self.finished = true;
        }
        let Some(last_row) = rows.last() else {
            self.finished = true;
            return Ok(None);
        };
        let last = last_row.get(&self.alias).cloned().ok_or_else(|| {
            DbError::invalid_argument(format!(
                "chunk column '{}' is missing from the selected rows",
                self.alias
            ))
        })?;
        self.last = Some(last);
        Ok(Some(result))
    }

    /// Lazily yield one result per chunk.
    pub fn into_stream(self) -> impl Stream<Item = DbResult<QueryResult>> + Send {
        futures_util::stream::try_unfold(self, |mut chunks| async move {
            Ok(chunks.next_chunk().await?.map(|result| (result, chunks)))
        })
    }

    /// Lazily yield the rows of every chunk in order.
    pub fn each(self) -> impl Stream<Item = DbResult<Row>> + Send {
        flatten_rows(self.into_stream())
    }
}

/// Offset chunking: round `n` reads `limit count offset n * count`.
///
/// Rows inserted or deleted between rounds can shift the window.
#[must_use]
pub struct ChunkByOffset<P: Pool> {
    query: Query<P>,
    count: i64,
    round: i64,
    finished: bool,
}

impl<P: Pool> ChunkByOffset<P> {
    pub(crate) fn new(query: Query<P>, count: i64) -> Self {
        Self {
            query,
            count,
            round: 0,
            finished: count < 1,
        }
    }

    pub async fn next_chunk(&mut self) -> DbResult<Option<QueryResult>> {
        if self.finished {
            return Ok(None);
        }

        let offset = self.round.checked_mul(self.count).ok_or_else(|| {
            DbError::invalid_argument(format!("chunk offset overflow at round {}", self.round))
        })?;
        let result = self
            .query
            .clone()
            .offset(offset)
            .limit(self.count)
            .select()
            .await?;
        self.round += 1;

        let rows = result.row_count()?;
        tracing::trace!(target: "fluentdb.chunk", offset, rows, "chunk by offset");
        if (rows as i64) < self.count {
            self.finished = true;
        }
        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(result))
    }

    pub fn into_stream(self) -> impl Stream<Item = DbResult<QueryResult>> + Send {
        futures_util::stream::try_unfold(self, |mut chunks| async move {
            Ok(chunks.next_chunk().await?.map(|result| (result, chunks)))
        })
    }

    pub fn each(self) -> impl Stream<Item = DbResult<Row>> + Send {
        flatten_rows(self.into_stream())
    }
}

fn flatten_rows<S>(chunks: S) -> impl Stream<Item = DbResult<Row>> + Send
where
    S: Stream<Item = DbResult<QueryResult>> + Send,
{
    chunks
        .and_then(|result| async move { result.into_rows() })
        .map_ok(|rows| futures_util::stream::iter(rows.into_iter().map(Ok::<Row, DbError>)))
        .try_flatten()
}
