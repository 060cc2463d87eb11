use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbSession;

pub async fn create_session(
    pool: &Pool<Postgres>,
    token: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<DbSession> {
    tracing::debug!("Creating session: user_id={}, expires_at={}", user_id, expires_at);

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        RETURNING token, user_id, expires_at, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Returns the session only while it has not expired.
pub async fn get_active_session(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbSession>> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        SELECT token, user_id, expires_at, created_at
        FROM sessions
        WHERE token = $1 AND expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_user_sessions(pool: &Pool<Postgres>, user_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_expired_sessions(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
        .execute(pool)
        .await?;

    tracing::debug!("Removed {} expired sessions", result.rows_affected());
    Ok(result.rows_affected())
}
