mod common;

use common::{ArticleTable, MemoryConnection, MemoryDb, MemoryPool, Response, ids, row};
use fluentdb::{
    DbError, FromRow, Query, QueryConfig, QueryOptions, QueryType, Row, SaveData, SortDir, Value,
    WhereCollector,
};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Article {
    id: i64,
    title: String,
}

impl FromRow for Article {
    fn from_row(row: &Row) -> fluentdb::DbResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
        })
    }
}

fn articles(count: i64) -> (Arc<MemoryDb>, Query<MemoryPool>) {
    let db = MemoryDb::articles(count);
    let query = Query::new(MemoryPool::new(Arc::clone(&db)));
    (db, query)
}

#[tokio::test]
async fn select_returns_rows_and_resets() {
    let (db, mut q) = articles(5);
    let result = q
        .table("article")
        .and_where("member_id", "=", 1)
        .order("id", SortDir::Desc)
        .select()
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(ids(result.get_array().unwrap()), vec![4, 1]);

    let last = db.last();
    assert_eq!(
        last.sql,
        "select * from `article` where `member_id` = :p1 order by `id` desc"
    );
    assert_eq!(last.binds.get(":p1"), Some(&Value::Int(1)));

    assert_eq!(q.options(), &QueryOptions::new(""));
    assert!(q.binds().is_empty());
}

#[tokio::test]
async fn find_and_typed_find() {
    let (db, mut q) = articles(3);
    let row = q.table("article").and_where("id", "=", 2).find().await.unwrap();
    assert_eq!(row.and_then(|r| r.get("title").cloned()), Some(Value::from("title-2")));
    assert_eq!(
        db.last().sql,
        "select * from `article` where `id` = :p1 limit :p2"
    );

    let article = q
        .table("article")
        .and_where("id", "=", 3)
        .find_as::<Article>()
        .await
        .unwrap();
    assert_eq!(article, Some(Article { id: 3, title: "title-3".into() }));

    let none = q
        .table("article")
        .where_raw("1=2")
        .find()
        .await
        .unwrap();
    assert_eq!(none, None);
}

#[tokio::test]
async fn value_falls_back_to_default() {
    let (db, mut q) = articles(3);
    let title = q
        .table("article")
        .and_where("id", "=", 1)
        .value("title", "none")
        .await
        .unwrap();
    assert_eq!(title, Value::from("title-1"));
    assert_eq!(
        db.last().sql,
        "select `title` from `article` where `id` = :p1 limit :p2"
    );

    let missing = q
        .table("article")
        .where_raw("1=2")
        .value("title", "none")
        .await
        .unwrap();
    assert_eq!(missing, Value::from("none"));
}

#[tokio::test]
async fn column_and_keyed_column() {
    let (_db, mut q) = articles(3);
    let titles = q.table("article").column("title").await.unwrap();
    assert_eq!(
        titles,
        vec![
            Value::from("title-1"),
            Value::from("title-2"),
            Value::from("title-3")
        ]
    );

    let keyed = q
        .table("article")
        .column_keyed("title", "id")
        .await
        .unwrap();
    assert_eq!(keyed.get("2"), Some(&Value::from("title-2")));
    assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn aggregates() {
    let (db, mut q) = articles(7);
    assert_eq!(q.table("article").count("*").await.unwrap(), 7);
    assert_eq!(db.last().sql, "select count(*) from `article`");

    let db = MemoryDb::new(|sql, _| {
        let (expression, value) = match sql {
            "select sum(`hits`) from `article`" => ("sum(`hits`)", Value::Int(42)),
            "select avg(`hits`) from `article`" => ("avg(`hits`)", Value::Float(10.5)),
            "select max(`hits`) from `article`" => ("max(`hits`)", Value::Null),
            other => return Response::Failed(format!("unexpected: {other}")),
        };
        Response::Rows(vec![row([(expression, value)])])
    });
    let mut q = Query::new(MemoryPool::new(db));
    assert_eq!(q.table("article").sum("hits").await.unwrap(), Value::Int(42));
    assert_eq!(q.table("article").avg("hits").await.unwrap(), Value::Float(10.5));
    assert_eq!(q.table("article").max("hits").await.unwrap(), Value::Null);
}

#[tokio::test]
async fn count_of_null_is_zero() {
    let db = MemoryDb::new(|_, _| Response::Rows(vec![row([("count(`id`)", Value::Null)])]));
    let mut q = Query::new(MemoryPool::new(db));
    assert_eq!(q.table("article").count("id").await.unwrap(), 0);
}

#[tokio::test]
async fn writes_report_affected_rows() {
    let db = MemoryDb::new(|sql, _| {
        if sql.starts_with("insert") {
            Response::Affected { rows: 1, last_insert_id: 11 }
        } else {
            Response::Affected { rows: 2, last_insert_id: 0 }
        }
    });
    let mut q = Query::new(MemoryPool::new(Arc::clone(&db)));

    let inserted = q
        .table("article")
        .insert(Some(&SaveData::new().set("title", "a").set("member_id", 1)))
        .await
        .unwrap();
    assert_eq!(inserted.last_insert_id().unwrap(), 11);
    assert_eq!(inserted.affected_rows().unwrap(), 1);
    assert_eq!(
        db.last().sql,
        "insert into `article` (`title`,`member_id`) values(:title,:member_id)"
    );

    let updated = q
        .table("article")
        .and_where("member_id", "=", 1)
        .set_field_inc("hits", 1)
        .update(None)
        .await
        .unwrap();
    assert_eq!(updated.affected_rows().unwrap(), 2);
    assert_eq!(
        db.last().sql,
        "update `article` set `hits` = `hits` + :fip1 where `member_id` = :p2"
    );

    q.table("article")
        .and_where("id", "=", 1)
        .limit(1)
        .delete()
        .await
        .unwrap();
    assert_eq!(
        db.last().sql,
        "delete from `article` where `id` = :p1 limit :p2"
    );

    q.table("article")
        .replace(Some(&SaveData::new().set("id", 1).set("title", "b")))
        .await
        .unwrap();
    assert_eq!(
        db.last().sql,
        "replace into `article` set `id` = :id,`title` = :title"
    );
    assert!(db.executed().iter().all(|e| e.route == QueryType::Write));
}

#[tokio::test]
async fn batch_insert() {
    let db = MemoryDb::new(|_, _| Response::Affected { rows: 2, last_insert_id: 1 });
    let mut q = Query::new(MemoryPool::new(Arc::clone(&db)));
    let rows = vec![
        SaveData::new().set("title", "a"),
        SaveData::new().set("title", "b"),
    ];
    let result = q.table("article").batch_insert(&rows).await.unwrap();
    assert_eq!(result.affected_rows().unwrap(), 2);
    assert_eq!(
        db.last().sql,
        "insert into `article` (`title`) values (:p1),(:p2)"
    );

    let err = q.table("article").batch_insert(&[]).await.unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(q.options(), &QueryOptions::new(""));
    assert_eq!(db.executed().len(), 1);
}

#[tokio::test]
async fn failed_statement_still_resets() {
    let db = MemoryDb::new(|_, _| Response::Failed("Table 'db.missing' doesn't exist".into()));
    let mut q = Query::new(MemoryPool::new(db));
    let result = q
        .table("missing")
        .and_where("id", "=", 1)
        .select()
        .await
        .unwrap();

    assert!(!result.is_success());
    assert_eq!(result.error(), Some("Table 'db.missing' doesn't exist"));
    assert!(result.get().unwrap_err().is_unsuccessful_result());
    assert_eq!(q.options(), &QueryOptions::new(""));
}

#[tokio::test]
async fn driver_errors_and_build_errors_reset() {
    let db = MemoryDb::new(|_, _| Response::Error("server has gone away".into()));
    let mut q = Query::new(MemoryPool::new(db));
    let err = q.table("article").select().await.unwrap_err();
    assert!(matches!(err, DbError::Execution(_)));
    assert_eq!(q.options(), &QueryOptions::new(""));

    let (db, mut q) = articles(1);
    let err = q
        .table("article")
        .where_between("id", 1, 2)
        .where_in("id", 1)
        .select()
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(db.executed().is_empty());
    assert_eq!(q.options(), &QueryOptions::new(""));
}

#[tokio::test]
async fn unresolvable_pool_resets() {
    let db = MemoryDb::articles(1);
    let mut q = Query::with_config(
        MemoryPool::new(Arc::clone(&db)),
        QueryConfig::new().with_pool_name("missing"),
    );
    let err = q
        .table("article")
        .and_where("id", "=", 1)
        .select()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Connection(_)));
    assert_eq!(q.options(), &QueryOptions::new(""));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn execute_literal_sql_with_binds() {
    let (db, mut q) = articles(3);
    let result = q
        .bind_value(":p1", 2)
        .execute("select * from `article` where `id` > :p1")
        .await
        .unwrap();
    assert_eq!(ids(result.get_array().unwrap()), vec![3]);
    assert_eq!(db.last().binds.get(":p1"), Some(&Value::Int(2)));
    assert!(q.binds().is_empty());
}

#[tokio::test]
async fn reads_route_to_replica_outside_transactions() {
    let (db, mut q) = articles(2);
    q.table("article").select().await.unwrap();
    q.table("article").set_field("title", "x").update(None).await.unwrap();
    let routes: Vec<QueryType> = db.executed().into_iter().map(|e| e.route).collect();
    assert_eq!(routes, vec![QueryType::Read, QueryType::Write]);
    assert_eq!(q.query_type(), QueryType::Write);

    db.begin();
    q.table("article").select().await.unwrap();
    assert_eq!(db.last().route, QueryType::Write);
    db.commit();
}

#[tokio::test]
async fn pinned_query_type_is_respected() {
    let db = MemoryDb::articles(2);
    let mut q = Query::with_config(
        MemoryPool::new(Arc::clone(&db)),
        QueryConfig::new().with_query_type(QueryType::Write),
    );
    q.table("article").select().await.unwrap();
    assert_eq!(db.last().route, QueryType::Write);
    assert_eq!(q.query_type(), QueryType::Write);
}

#[tokio::test]
async fn injected_connection_is_used_for_every_statement() {
    let db = MemoryDb::articles(2);
    let conn = MemoryConnection::new(Arc::clone(&db), QueryType::Write);
    let mut q = Query::with_connection(conn);

    db.begin();
    let result = q.table("article").select().await.unwrap();
    assert_eq!(result.row_count().unwrap(), 2);
    assert_eq!(db.last().route, QueryType::Write);
    db.commit();
}

#[tokio::test]
async fn clones_are_independent() {
    let (db, mut q) = articles(5);
    q.table("article").and_where("member_id", "=", 2);
    let mut copy = q.clone();
    copy.order("id", SortDir::Desc).limit(1);

    let first = copy.select().await.unwrap();
    assert_eq!(ids(first.get_array().unwrap()), vec![5]);

    let all = q.select().await.unwrap();
    assert_eq!(ids(all.get_array().unwrap()), vec![2, 5]);
    assert_eq!(
        db.sqls(),
        vec![
            "select * from `article` where `member_id` = :p1 order by `id` desc limit :p2",
            "select * from `article` where `member_id` = :p1",
        ]
    );
}

#[test]
fn article_table_projects_ids() {
    let table = ArticleTable::new(3);
    let mut binds = fluentdb::Binds::new();
    binds.set(":p1", 0);
    binds.set(":p2", 2);
    let Response::Rows(rows) = table.handle("select `id` from `article` limit :p1,:p2", &binds)
    else {
        panic!("expected rows");
    };
    assert_eq!(ids(&rows), vec![1, 2]);
    assert_eq!(rows[0].len(), 1);
}
