//! In-memory driver for integration tests.
//!
//! [`MemoryDb`] answers every statement through a handler closure and records
//! what was executed, on which route. [`ArticleTable`] is a small interpreter
//! for the statements the chunk and pagination helpers generate.

#![allow(dead_code)]

use fluentdb::{Binds, Connection, DbError, DbResult, Pool, QueryType, Row, Statement, Value};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

/// What the handler makes of one statement.
pub enum Response {
    Rows(Vec<Row>),
    Affected { rows: u64, last_insert_id: u64 },
    /// Executed, but the driver reports an error.
    Failed(String),
    /// The driver raises.
    Error(String),
}

type Handler = dyn Fn(&str, &Binds) -> Response + Send + Sync;

#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub binds: Binds,
    pub route: QueryType,
}

pub struct MemoryDb {
    handler: Box<Handler>,
    log: Mutex<Vec<Executed>>,
    in_transaction: AtomicBool,
}

impl MemoryDb {
    pub fn new(handler: impl Fn(&str, &Binds) -> Response + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
            in_transaction: AtomicBool::new(false),
        })
    }

    /// Database holding `count` articles with ids `1..=count`.
    pub fn articles(count: i64) -> Arc<Self> {
        let table = ArticleTable::new(count);
        Self::new(move |sql, binds| table.handle(sql, binds))
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.log.lock().unwrap().clone()
    }

    pub fn sqls(&self) -> Vec<String> {
        self.executed().into_iter().map(|e| e.sql).collect()
    }

    pub fn last(&self) -> Executed {
        self.executed().pop().expect("no statement executed")
    }

    pub fn begin(&self) {
        self.in_transaction.store(true, Ordering::SeqCst);
    }

    pub fn commit(&self) {
        self.in_transaction.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct MemoryPool {
    db: Arc<MemoryDb>,
}

impl MemoryPool {
    pub fn new(db: Arc<MemoryDb>) -> Arc<Self> {
        Arc::new(Self { db })
    }
}

impl Pool for MemoryPool {
    type Connection = MemoryConnection;

    async fn get(
        &self,
        pool_name: Option<&str>,
        query_type: QueryType,
    ) -> DbResult<MemoryConnection> {
        match pool_name {
            Some("missing") => Err(DbError::connection("pool 'missing' is not configured")),
            _ => Ok(MemoryConnection::new(Arc::clone(&self.db), query_type)),
        }
    }
}

#[derive(Clone)]
pub struct MemoryConnection {
    db: Arc<MemoryDb>,
    route: QueryType,
}

impl MemoryConnection {
    pub fn new(db: Arc<MemoryDb>, route: QueryType) -> Self {
        Self { db, route }
    }
}

impl Connection for MemoryConnection {
    type Statement = MemoryStatement;

    async fn prepare(&self, sql: &str) -> DbResult<MemoryStatement> {
        Ok(MemoryStatement {
            db: Arc::clone(&self.db),
            route: self.route,
            sql: sql.to_string(),
            rows: VecDeque::new(),
            columns: 0,
            error: None,
            affected: 0,
            last_insert_id: 0,
        })
    }

    fn in_transaction(&self) -> bool {
        self.db.in_transaction.load(Ordering::SeqCst)
    }
}

pub struct MemoryStatement {
    db: Arc<MemoryDb>,
    route: QueryType,
    sql: String,
    rows: VecDeque<Row>,
    columns: usize,
    error: Option<String>,
    affected: u64,
    last_insert_id: u64,
}

impl Statement for MemoryStatement {
    async fn execute(&mut self, binds: &Binds) -> DbResult<bool> {
        self.db.log.lock().unwrap().push(Executed {
            sql: self.sql.clone(),
            binds: binds.clone(),
            route: self.route,
        });
        match (self.db.handler)(&self.sql, binds) {
            Response::Rows(rows) => {
                self.columns = rows.first().map_or(1, Row::len);
                self.affected = rows.len() as u64;
                self.rows = rows.into();
                Ok(true)
            }
            Response::Affected {
                rows,
                last_insert_id,
            } => {
                self.affected = rows;
                self.last_insert_id = last_insert_id;
                Ok(true)
            }
            Response::Failed(message) => {
                self.error = Some(message);
                Ok(false)
            }
            Response::Error(message) => Err(DbError::execution(message)),
        }
    }

    async fn fetch(&mut self) -> DbResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }

    fn error_info(&self) -> Option<String> {
        self.error.clone()
    }

    fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    fn row_count(&self) -> u64 {
        self.affected
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn sql(&self) -> &str {
        &self.sql
    }
}

pub fn row<const N: usize>(columns: [(&str, Value); N]) -> Row {
    columns.into_iter().collect()
}

pub fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .collect()
}

static SEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`id` ([<>]) (:p[0-9a-f]+)").unwrap());
static ID_EQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`id` = (:p[0-9a-f]+)").unwrap());
static MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`member_id` = (:p[0-9a-f]+)").unwrap());
static IN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`id` in \(([^)]*)\)").unwrap());
static FIELD_ORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"order by field\(`id`, ([^)]*)\)").unwrap());
static LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"limit (:p[0-9a-f]+)(?:,(:p[0-9a-f]+))?$").unwrap());
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^select (count\(.*\)) from").unwrap());

/// `article(id, title, member_id)` with `member_id = id % 3`.
pub struct ArticleTable {
    rows: Vec<Row>,
}

impl ArticleTable {
    pub fn new(count: i64) -> Self {
        let rows = (1..=count)
            .map(|id| {
                row([
                    ("id", Value::Int(id)),
                    ("title", Value::from(format!("title-{id}"))),
                    ("member_id", Value::Int(id % 3)),
                ])
            })
            .collect();
        Self { rows }
    }

    pub fn handle(&self, sql: &str, binds: &Binds) -> Response {
        if !sql.starts_with("select") {
            return Response::Affected {
                rows: 1,
                last_insert_id: self.rows.len() as u64 + 1,
            };
        }
        if sql.contains("1=2") {
            return Response::Rows(Vec::new());
        }

        let int = |name: &str| binds.get(name).and_then(Value::as_i64).unwrap_or_default();
        let mut rows = self.rows.clone();

        if let Some(caps) = SEEK_RE.captures(sql) {
            let last = int(&caps[2]);
            let after = &caps[1] == ">";
            rows.retain(|r| {
                let id = r.get("id").and_then(Value::as_i64).unwrap_or_default();
                if after { id > last } else { id < last }
            });
        }
        if let Some(caps) = ID_EQ_RE.captures(sql) {
            let id = Value::Int(int(&caps[1]));
            rows.retain(|r| r.get("id") == Some(&id));
        }
        if let Some(caps) = MEMBER_RE.captures(sql) {
            let member = Value::Int(int(&caps[1]));
            rows.retain(|r| r.get("member_id") == Some(&member));
        }
        if let Some(caps) = IN_RE.captures(sql) {
            let wanted: Vec<i64> = caps[1].split(',').map(|name| int(name.trim())).collect();
            rows.retain(|r| {
                r.get("id")
                    .and_then(Value::as_i64)
                    .is_some_and(|id| wanted.contains(&id))
            });
        }

        if let Some(caps) = COUNT_RE.captures(sql) {
            let expression = caps[1].to_string();
            let total = if expression.contains("distinct member_id") {
                let mut members: Vec<i64> = rows
                    .iter()
                    .filter_map(|r| r.get("member_id").and_then(Value::as_i64))
                    .collect();
                members.sort_unstable();
                members.dedup();
                members.len()
            } else {
                rows.len()
            };
            return Response::Rows(vec![row([(expression.as_str(), Value::Int(total as i64))])]);
        }

        if sql.contains("order by `id` desc") {
            rows.reverse();
        }
        if let Some(caps) = FIELD_ORDER_RE.captures(sql) {
            let order: Vec<i64> = caps[1].split(',').map(|name| int(name.trim())).collect();
            rows.sort_by_key(|r| {
                let id = r.get("id").and_then(Value::as_i64).unwrap_or_default();
                order.iter().position(|o| *o == id)
            });
        }
        if let Some(caps) = LIMIT_RE.captures(sql) {
            let (offset, limit) = match caps.get(2) {
                Some(limit) => (int(&caps[1]), int(limit.as_str())),
                None => (0, int(&caps[1])),
            };
            rows = rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
        }
        if sql.starts_with("select `id` from") {
            rows = rows
                .iter()
                .map(|r| row([("id", r.get("id").cloned().unwrap_or_default())]))
                .collect();
        }

        Response::Rows(rows)
    }
}
