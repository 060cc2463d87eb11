use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::{DbEmailLog, NewEmailLog};

pub async fn insert_email_log(pool: &Pool<Postgres>, log: &NewEmailLog) -> Result<DbEmailLog> {
    let stored = sqlx::query_as::<_, DbEmailLog>(
        r#"
        INSERT INTO email_logs (
            to_addresses, bcc_addresses, from_name, from_address, subject, body,
            user_id, full_user_name, is_body_html, error_message
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, to_addresses, bcc_addresses, from_name, from_address, subject, body,
                  sent_date, user_id, full_user_name, is_body_html, resent_email, error_message
        "#,
    )
    .bind(&log.to_addresses)
    .bind(&log.bcc_addresses)
    .bind(&log.from_name)
    .bind(&log.from_address)
    .bind(&log.subject)
    .bind(&log.body)
    .bind(log.user_id)
    .bind(&log.full_user_name)
    .bind(log.is_body_html)
    .bind(&log.error_message)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Email log stored: id={}, subject={}", stored.id, stored.subject);
    Ok(stored)
}
