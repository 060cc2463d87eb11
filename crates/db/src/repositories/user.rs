use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbUser;

pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<DbUser> {
    tracing::debug!("Creating user: email={}", email);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (email, name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, name, password_hash, email_confirmed, two_factor_enabled, roles, created_at
        "#,
    )
    .bind(email.trim())
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    tracing::debug!("User created successfully: id={}", user.id);
    Ok(user)
}

/// Case-insensitive lookup.
pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, name, password_hash, email_confirmed, two_factor_enabled, roles, created_at
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, name, password_hash, email_confirmed, two_factor_enabled, roles, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn mark_email_confirmed(pool: &Pool<Postgres>, id: i64) -> Result<()> {
    tracing::debug!("Confirming email for user: id={}", id);

    sqlx::query("UPDATE users SET email_confirmed = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Removes the account; tokens and sessions go with it.
pub async fn delete_user(pool: &Pool<Postgres>, id: i64) -> Result<()> {
    tracing::debug!("Deleting user: id={}", id);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_password_hash(pool: &Pool<Postgres>, id: i64, password_hash: &str) -> Result<()> {
    tracing::debug!("Updating password for user: id={}", id);

    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}
