use crate::client::Statement;
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, Row};
use futures_core::Stream;

/// Forward-only view over a live statement.
///
/// Rows are fetched one at a time. Once the statement is exhausted every
/// further [`next`](Self::next) returns `Ok(None)`; the cursor cannot be
/// rewound.
#[must_use]
pub struct CursorResult<S> {
    statement: S,
    success: bool,
    error: Option<String>,
    exhausted: bool,
}

impl<S: Statement> CursorResult<S> {
    pub fn new(statement: S, executed: bool) -> Self {
        let error = statement.error_info();
        Self {
            success: executed && error.is_none(),
            statement,
            error,
            exhausted: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn sql(&self) -> &str {
        self.statement.sql()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn next(&mut self) -> DbResult<Option<Row>> {
        if !self.success {
            return Err(DbError::unsuccessful(self.statement.sql(), self.error.clone()));
        }
        if self.exhausted {
            return Ok(None);
        }
        let row = self.statement.fetch().await?;
        if row.is_none() {
            self.exhausted = true;
        }
        Ok(row)
    }

    pub async fn next_as<T: FromRow>(&mut self) -> DbResult<Option<T>> {
        self.next().await?.as_ref().map(T::from_row).transpose()
    }

    /// Consume the cursor as a row stream.
    pub fn into_stream(self) -> impl Stream<Item = DbResult<Row>> + Send {
        futures_util::stream::try_unfold(self, |mut cursor| async move {
            Ok(cursor.next().await?.map(|row| (row, cursor)))
        })
    }
}
