mod common;

use common::{MemoryDb, MemoryPool, Response, ids, row};
use fluentdb::{Query, QueryOptions, Row, SortDir, Value, WhereCollector};
use futures_util::TryStreamExt;
use std::sync::Arc;

fn articles(count: i64) -> (Arc<MemoryDb>, Query<MemoryPool>) {
    let db = MemoryDb::articles(count);
    let query = Query::new(MemoryPool::new(Arc::clone(&db)));
    (db, query)
}

#[tokio::test]
async fn cursor_yields_rows_until_exhausted() {
    let (db, mut q) = articles(3);
    let mut cursor = q.table("article").cursor().await.unwrap();
    assert!(cursor.is_success());
    assert_eq!(cursor.sql(), "select * from `article`");
    assert_eq!(q.options(), &QueryOptions::new(""));

    let mut seen = Vec::new();
    while let Some(row) = cursor.next().await.unwrap() {
        seen.push(row);
    }
    assert_eq!(ids(&seen), vec![1, 2, 3]);
    assert_eq!(cursor.next().await.unwrap(), None);
    assert_eq!(db.executed().len(), 1);
}

#[tokio::test]
async fn cursor_as_stream() {
    let (_db, mut q) = articles(4);
    let cursor = q
        .table("article")
        .order("id", SortDir::Desc)
        .cursor()
        .await
        .unwrap();
    let rows: Vec<Row> = cursor.into_stream().try_collect().await.unwrap();
    assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn failed_cursor_refuses_to_fetch() {
    let db = MemoryDb::new(|_, _| Response::Failed("syntax error".into()));
    let mut q = Query::new(MemoryPool::new(db));
    let mut cursor = q.table("article").cursor().await.unwrap();
    assert!(!cursor.is_success());
    assert_eq!(cursor.error(), Some("syntax error"));
    assert!(cursor.next().await.unwrap_err().is_unsuccessful_result());
}

#[tokio::test]
async fn chunk_by_id_seeks_forward() {
    let (db, mut q) = articles(7);
    let mut chunks = q.table("article").chunk_by_id(3, "id", None, SortDir::Asc);
    assert_eq!(q.options(), &QueryOptions::new(""));

    let mut rounds = Vec::new();
    while let Some(result) = chunks.next_chunk().await.unwrap() {
        rounds.push(ids(result.get_array().unwrap()));
    }
    assert_eq!(rounds, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    assert_eq!(chunks.next_chunk().await.unwrap(), None);

    let executed = db.executed();
    assert_eq!(executed.len(), 3);
    assert_eq!(
        executed[0].sql,
        "select * from `article` order by `id` asc limit :p1"
    );
    assert_eq!(
        executed[1].sql,
        "select * from `article` where `id` > :p1 order by `id` asc limit :p2"
    );
    assert_eq!(executed[1].binds.get(":p1"), Some(&Value::Int(3)));
    assert_eq!(executed[2].binds.get(":p1"), Some(&Value::Int(6)));
}

#[tokio::test]
async fn chunk_by_id_full_last_round_needs_one_more_query() {
    let (db, mut q) = articles(6);
    let rows: Vec<Row> = q
        .table("article")
        .chunk_by_id(3, "id", None, SortDir::Asc)
        .each()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(ids(&rows), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(db.executed().len(), 3);
}

#[tokio::test]
async fn chunk_by_id_descending() {
    let (db, mut q) = articles(5);
    let chunks: Vec<Vec<i64>> = q
        .table("article")
        .order("title", SortDir::Asc)
        .chunk_by_id(2, "id", None, SortDir::Desc)
        .into_stream()
        .map_ok(|result| ids(result.get_array().unwrap()))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(chunks, vec![vec![5, 4], vec![3, 2], vec![1]]);
    assert_eq!(
        db.sqls()[1],
        "select * from `article` where `id` < :p1 order by `id` desc limit :p2"
    );
}

#[tokio::test]
async fn chunk_by_id_brackets_or_conditions() {
    let (db, mut q) = articles(5);
    let mut chunks = q
        .table("article")
        .and_where("member_id", "=", 1)
        .or_where("member_id", "=", 2)
        .chunk_by_id(2, "id", None, SortDir::Asc);
    chunks.next_chunk().await.unwrap();
    chunks.next_chunk().await.unwrap();

    let sqls = db.sqls();
    assert_eq!(
        sqls[0],
        "select * from `article` where (`member_id` = :p1 or `member_id` = :p2) order by `id` asc limit :p3"
    );
    assert_eq!(
        sqls[1],
        "select * from `article` where (`member_id` = :p1 or `member_id` = :p2) and `id` > :p3 order by `id` asc limit :p4"
    );
}

#[tokio::test]
async fn chunk_by_id_with_alias() {
    let db = MemoryDb::new(|sql, binds| {
        let after = binds.get(":p1").and_then(Value::as_i64);
        let rows = match (sql.contains("`a`.`id` >"), after) {
            (false, _) => vec![1, 2],
            (true, Some(2)) => vec![3],
            _ => Vec::new(),
        };
        Response::Rows(
            rows.into_iter()
                .map(|id| row([("article_id", Value::Int(id))]))
                .collect(),
        )
    });
    let mut q = Query::new(MemoryPool::new(Arc::clone(&db)));
    let rows: Vec<Row> = q
        .from("article", Some("a"), None)
        .field("a.id as article_id")
        .chunk_by_id(2, "a.id", Some("article_id"), SortDir::Asc)
        .each()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        db.sqls()[1],
        "select `a`.`id` as `article_id` from `article` as `a` where `a`.`id` > :p1 order by `a`.`id` asc limit :p2"
    );
}

#[tokio::test]
async fn chunk_by_id_requires_the_seek_column() {
    let db = MemoryDb::new(|_, _| Response::Rows(vec![row([("title", Value::from("a"))])]));
    let mut q = Query::new(MemoryPool::new(db));
    let mut chunks = q.table("article").chunk_by_id(1, "id", None, SortDir::Asc);
    let err = chunks.next_chunk().await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn chunk_by_offset_pages_through() {
    let (db, mut q) = articles(5);
    let rows: Vec<Row> = q
        .table("article")
        .where_raw("1=1")
        .chunk_by_offset(2)
        .each()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(ids(&rows), vec![1, 2, 3, 4, 5]);

    let executed = db.executed();
    assert_eq!(executed.len(), 3);
    assert_eq!(
        executed[2].sql,
        "select * from `article` where 1=1 limit :p1,:p2"
    );
    assert_eq!(executed[2].binds.get(":p1"), Some(&Value::Int(4)));
}

#[tokio::test]
async fn chunk_on_empty_table() {
    let (db, mut q) = articles(0);
    let mut by_id = q.table("article").chunk_by_id(10, "id", None, SortDir::Asc);
    assert!(by_id.next_chunk().await.unwrap().is_none());

    let mut by_offset = q.table("article").chunk_by_offset(10);
    assert!(by_offset.next_chunk().await.unwrap().is_none());
    assert_eq!(db.executed().len(), 2);

    let mut zero = q.table("article").chunk_by_offset(0);
    assert!(zero.next_chunk().await.unwrap().is_none());
    assert_eq!(db.executed().len(), 2);
}
