mod common;

use std::sync::Arc;

use auth::RevocationRecord;
use auth::RevocationStore;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use common::TestDb;
use journal_api::outbound::repositories::PostgresRevocationStore;

fn record(token_id: &str, expires_at: DateTime<Utc>) -> RevocationRecord {
    RevocationRecord {
        token_id: token_id.to_string(),
        subject_id: "42".to_string(),
        expires_at,
    }
}

// Postgres keeps microseconds; whole seconds round-trip exactly.
fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

#[tokio::test]
async fn test_revoke_and_is_revoked() {
    let db = TestDb::new().await;
    let store = PostgresRevocationStore::new(db.pool.clone());

    assert!(!store.is_revoked("jti-1").await.unwrap());

    store.revoke(&record("jti-1", at(2_000_000_000))).await.unwrap();

    assert!(store.is_revoked("jti-1").await.unwrap());
    assert!(!store.is_revoked("jti-2").await.unwrap());
}

#[tokio::test]
async fn test_revoke_keeps_original_expiry() {
    let db = TestDb::new().await;
    let store = PostgresRevocationStore::new(db.pool.clone());

    store.revoke(&record("jti-1", at(2_000_000_000))).await.unwrap();
    store.revoke(&record("jti-1", at(2_100_000_000))).await.unwrap();

    let expires_at: DateTime<Utc> =
        sqlx::query_scalar("SELECT expires_at FROM revoked_tokens WHERE token_id = $1")
            .bind("jti-1")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(expires_at, at(2_000_000_000));
}

#[tokio::test]
async fn test_concurrent_revoke_is_idempotent() {
    let db = TestDb::new().await;
    let store = Arc::new(PostgresRevocationStore::new(db.pool.clone()));
    let expires_at = Utc::now() + Duration::minutes(30);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.revoke(&record("jti-1", expires_at)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_gc_removes_only_expired() {
    let db = TestDb::new().await;
    let store = PostgresRevocationStore::new(db.pool.clone());

    store.revoke(&record("past", at(1_000))).await.unwrap();
    store.revoke(&record("edge", at(2_000))).await.unwrap();
    store.revoke(&record("future", at(2_001))).await.unwrap();

    assert_eq!(store.gc(at(2_000)).await.unwrap(), 2);
    for _ in 0..3 {
        assert_eq!(store.gc(at(2_000)).await.unwrap(), 0);
    }

    assert!(!store.is_revoked("past").await.unwrap());
    assert!(!store.is_revoked("edge").await.unwrap());
    assert!(store.is_revoked("future").await.unwrap());
}

#[tokio::test]
async fn test_closed_pool_is_unavailable() {
    let db = TestDb::new().await;
    let store = PostgresRevocationStore::new(db.pool.clone());
    db.pool.close().await;

    assert!(matches!(
        store.is_revoked("jti-1").await,
        Err(auth::RevocationError::Unavailable(_))
    ));
}
