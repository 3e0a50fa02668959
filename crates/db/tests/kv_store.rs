//! Postgres-backed KV store tests. Require a database (`DATABASE_URL`).

use roomify_core::kv::KvStore;
use roomify_db::PgKvStore;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_overwrites_previous_value(pool: PgPool) {
    let store = PgKvStore::new(pool);

    store.set("ns_u1_p1", json!({"id": "p1", "name": "a"})).await.unwrap();
    store.set("ns_u1_p1", json!({"id": "p1", "name": "b"})).await.unwrap();

    let value = store.get("ns_u1_p1").await.unwrap().unwrap();
    assert_eq!(value["name"], "b");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn missing_key_reads_none(pool: PgPool) {
    let store = PgKvStore::new(pool);
    assert!(store.get("ns_u1_nope").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_treats_underscore_literally(pool: PgPool) {
    let store = PgKvStore::new(pool);

    store.set("ns_u1_a", json!({"id": "a"})).await.unwrap();
    store.set("ns_u1_b", json!({"id": "b"})).await.unwrap();
    // `_` would match any character in an unescaped LIKE.
    store.set("ns_u1xc", json!({"id": "c"})).await.unwrap();
    store.set("ns_u2_d", json!({"id": "d"})).await.unwrap();

    let keys: Vec<String> = store
        .list("ns_u1_")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert_eq!(keys, vec!["ns_u1_a", "ns_u1_b"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_check_passes(pool: PgPool) {
    roomify_db::health_check(&pool).await.unwrap();
}
