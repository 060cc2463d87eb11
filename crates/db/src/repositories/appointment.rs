use agenda_core::models::appointment::{AppointmentQuery, AppointmentUpdate, NewAppointment};
use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbAppointment;

const APPOINTMENT_COLUMNS: &str = "id, title, description, start_time, end_time, location, \
     is_confirmed, is_cancelled, cancellation_reason, meeting_link, send_reminder, \
     user_id, user_email, created_at";

/// Optional filters are bound as NULL and short-circuit in SQL, so one
/// statement serves every combination.
const QUERY_FILTER: &str = r#"
    WHERE ($1::timestamp IS NULL OR start_time >= $1)
      AND ($2::timestamp IS NULL OR start_time < $2)
      AND ($3::bigint IS NULL OR user_id = $3)
      AND ($4 OR NOT is_cancelled)
"#;

/// Inserts an appointment and returns only the new id.
pub async fn create_appointment(pool: &Pool<Postgres>, appointment: &NewAppointment) -> Result<i64> {
    tracing::debug!(
        "Creating appointment: title={}, start={}, end={}, user_id={}",
        appointment.title,
        appointment.start_time,
        appointment.end_time,
        appointment.user_id
    );

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO appointments (
            title, description, start_time, end_time, location,
            is_confirmed, is_cancelled, send_reminder, user_id, user_email
        )
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&appointment.title)
    .bind(&appointment.description)
    .bind(appointment.start_time)
    .bind(appointment.end_time)
    .bind(&appointment.location)
    .bind(appointment.is_confirmed.is_yes())
    .bind(appointment.send_reminder.is_yes())
    .bind(appointment.user_id)
    .bind(&appointment.user_email)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Appointment created successfully: id={}", id);
    Ok(id)
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments WHERE id = $1",
        APPOINTMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if appointment.is_none() {
        tracing::debug!("Appointment not found: id={}", id);
    }

    Ok(appointment)
}

/// Overwrites every mutable column. Returns false when no row matched.
pub async fn update_appointment(
    pool: &Pool<Postgres>,
    id: i64,
    update: &AppointmentUpdate,
) -> Result<bool> {
    tracing::debug!("Updating appointment: id={}, title={}", id, update.title);

    let result = sqlx::query(
        r#"
        UPDATE appointments
        SET title = $2,
            description = $3,
            start_time = $4,
            end_time = $5,
            location = $6,
            is_confirmed = $7,
            is_cancelled = $8,
            cancellation_reason = $9,
            meeting_link = $10,
            send_reminder = $11
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.start_time)
    .bind(update.end_time)
    .bind(&update.location)
    .bind(update.is_confirmed.is_yes())
    .bind(update.is_cancelled.is_yes())
    .bind(&update.cancellation_reason)
    .bind(&update.meeting_link)
    .bind(update.send_reminder.is_yes())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_appointment(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    tracing::debug!("Deleting appointment: id={}", id);

    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_appointments(
    pool: &Pool<Postgres>,
    query: &AppointmentQuery,
) -> Result<Vec<DbAppointment>> {
    tracing::debug!("Listing appointments: {:?}", query);

    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments {} ORDER BY start_time, id",
        APPOINTMENT_COLUMNS, QUERY_FILTER
    ))
    .bind(query.starts_from)
    .bind(query.starts_before)
    .bind(query.user_id)
    .bind(query.include_cancelled)
    .fetch_all(pool)
    .await?;

    tracing::debug!("Found {} appointments", rows.len());
    Ok(rows)
}

pub async fn count_appointments(pool: &Pool<Postgres>, query: &AppointmentQuery) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM appointments {}",
        QUERY_FILTER
    ))
    .bind(query.starts_from)
    .bind(query.starts_before)
    .bind(query.user_id)
    .bind(query.include_cancelled)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
