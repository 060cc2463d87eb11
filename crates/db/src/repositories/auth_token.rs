use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::{DbAuthToken, TokenPurpose};

/// Stores a new one-time token, invalidating any unused token issued earlier
/// for the same user and purpose.
pub async fn create_auth_token(
    pool: &Pool<Postgres>,
    user_id: i64,
    purpose: TokenPurpose,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<DbAuthToken> {
    tracing::debug!(
        "Creating auth token: user_id={}, purpose={}",
        user_id,
        purpose.as_str()
    );

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE auth_tokens SET consumed_at = NOW()
        WHERE user_id = $1 AND purpose = $2 AND consumed_at IS NULL
        "#,
    )
    .bind(user_id)
    .bind(purpose.as_str())
    .execute(&mut *tx)
    .await?;

    let created = sqlx::query_as::<_, DbAuthToken>(
        r#"
        INSERT INTO auth_tokens (user_id, purpose, token, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, purpose, token, expires_at, consumed_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(purpose.as_str())
    .bind(token)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// Marks a matching, unexpired, unused token as consumed. Returns whether one
/// was found.
pub async fn consume_auth_token(
    pool: &Pool<Postgres>,
    user_id: i64,
    purpose: TokenPurpose,
    token: &str,
) -> Result<bool> {
    let consumed = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE auth_tokens SET consumed_at = NOW()
        WHERE user_id = $1
          AND purpose = $2
          AND token = $3
          AND consumed_at IS NULL
          AND expires_at > NOW()
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(purpose.as_str())
    .bind(token.trim())
    .fetch_optional(pool)
    .await?;

    tracing::debug!(
        "Auth token redemption: user_id={}, purpose={}, accepted={}",
        user_id,
        purpose.as_str(),
        consumed.is_some()
    );
    Ok(consumed.is_some())
}
