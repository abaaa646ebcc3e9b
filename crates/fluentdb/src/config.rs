//! Query construction settings.

use crate::client::QueryType;
use serde::Deserialize;
use tracing::Level;

/// Level at which executed SQL is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// How executed statements are reported through `tracing`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqlLogConfig {
    /// Emit an event per executed statement.
    pub enabled: bool,
    pub level: LogLevel,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Render bind values into the logged SQL.
    pub inline_binds: bool,
}

impl Default for SqlLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            max_sql_length: Some(200),
            inline_binds: false,
        }
    }
}

impl SqlLogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn with_inline_binds(mut self, inline: bool) -> Self {
        self.inline_binds = inline;
        self
    }

    pub fn disable(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Settings a [`Query`](crate::Query) is constructed with.
///
/// Deserializable so it can sit inside an application's own config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Pool to resolve connections from. `None` uses the pool's default.
    pub pool_name: Option<String>,
    /// Pin the classification. Unpinned queries start as writes and turn
    /// into reads for non-transactional selects.
    pub query_type: Option<QueryType>,
    /// Table prefix. `None` asks the connection or pool.
    pub table_prefix: Option<String>,
    pub log: SqlLogConfig,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_name(mut self, name: impl Into<String>) -> Self {
        self.pool_name = Some(name.into());
        self
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    pub fn with_log(mut self, log: SqlLogConfig) -> Self {
        self.log = log;
        self
    }
}
