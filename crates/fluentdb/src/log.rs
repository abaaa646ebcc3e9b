//! `tracing` output for executed statements.

use crate::client::QueryType;
use crate::config::SqlLogConfig;
use crate::debug::debug_sql;
use crate::param::Binds;
use std::borrow::Cow;
use tracing::Level;

/// Emit the SQL that is about to be executed, before the driver sees it.
pub(crate) fn log_statement(
    config: &SqlLogConfig,
    query_type: QueryType,
    pool_name: Option<&str>,
    sql: &str,
    binds: &Binds,
) {
    if !config.enabled {
        return;
    }

    /// Dispatch a tracing event at a runtime-determined level.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                Level::ERROR => tracing::error!($($field)*),
                Level::WARN  => tracing::warn!($($field)*),
                Level::INFO  => tracing::info!($($field)*),
                Level::DEBUG => tracing::debug!($($field)*),
                Level::TRACE => tracing::trace!($($field)*),
            }
        };
    }

    let rendered: Cow<'_, str> = if config.inline_binds {
        Cow::Owned(debug_sql(sql, binds))
    } else {
        Cow::Borrowed(sql)
    };
    let sql = truncate_sql(&rendered, config.max_sql_length);
    let pool = pool_name.unwrap_or("-");

    emit_at_level!(
        Level::from(config.level),
        target: "fluentdb.sql",
        query_type = ?query_type,
        pool,
        param_count = binds.len(),
        sql = %sql,
    );
}

fn truncate_sql(sql: &str, max: Option<usize>) -> Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max))),
        _ => Cow::Borrowed(sql),
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
