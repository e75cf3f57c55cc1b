//! Exercises `PgRequestStore` against a real database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`. Each test
//! works in its own freshly created schema so runs do not interfere.

use request_desk::db::models::requests::{Decision, DecisionPolicy, RequestStatus};
use request_desk::db::{PgRequestStore, RequestStore};
use request_desk::error::RequestError;
use sqlx::postgres::PgPoolOptions;

async fn store(schema: &str) -> PgRequestStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let setup = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to the database");
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&setup)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&setup)
        .await
        .unwrap();
    setup.close().await;

    let search_path = format!("SET search_path TO {schema}");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                sqlx::query(&search_path).execute(conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .unwrap();

    let store = PgRequestStore::new(pool);
    store.initialize().await.unwrap();
    store
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn initialize_is_idempotent() {
    let store = store("desk_init").await;
    store.initialize().await.unwrap();
    store.initialize().await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn insert_list_and_decide() {
    let store = store("desk_lifecycle").await;

    let a = store.insert("a", None).await.unwrap();
    let b = store.insert("b", Some("details")).await.unwrap();
    assert!(b.id > a.id);
    assert_eq!(a.status, RequestStatus::Pending);
    assert!(a.decided_at.is_none());

    let ids: Vec<i32> = store.list_all().await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, [b.id, a.id]);

    let approved = store
        .decide(a.id, Decision::Approve, DecisionPolicy::Final)
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.decided_at.is_some());

    let err = store
        .decide(a.id, Decision::Reject, DecisionPolicy::Final)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RequestError::Conflict { status: RequestStatus::Approved, .. }
    ));

    let err = store
        .decide(9999, Decision::Reject, DecisionPolicy::Final)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::NotFound(9999)));

    let overwritten = store
        .decide(a.id, Decision::Reject, DecisionPolicy::Overwrite)
        .await
        .unwrap();
    assert_eq!(overwritten.status, RequestStatus::Rejected);
    assert!(overwritten.decided_at >= approved.decided_at);

    store.close().await;
}
