use async_trait::async_trait;
use auth::RevocationError;
use auth::RevocationRecord;
use auth::RevocationStore;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

/// Revocation store backed by the `revoked_tokens` table.
///
/// Every call goes to the primary, so a logout committed on one instance is
/// visible to the next request on any other instance. Only the token id is
/// persisted, never the bearer token itself.
pub struct PostgresRevocationStore {
    pool: PgPool,
}

impl PostgresRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: sqlx::Error) -> RevocationError {
    RevocationError::Unavailable(e.to_string())
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn revoke(&self, record: &RevocationRecord) -> Result<(), RevocationError> {
        // Insert-if-absent: a second revoke of the same id neither fails nor
        // touches the stored expiry.
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token_id, subject_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token_id) DO NOTHING
            "#,
        )
        .bind(&record.token_id)
        .bind(&record.subject_id)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token_id = $1)
            "#,
        )
        .bind(token_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }

    async fn gc(&self, now: DateTime<Utc>) -> Result<u64, RevocationError> {
        let result = sqlx::query(
            r#"
            DELETE FROM revoked_tokens
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected())
    }
}
