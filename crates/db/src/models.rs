use agenda_core::models::appointment::Appointment;
use agenda_core::models::email::EmailLog;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub is_confirmed: bool,
    pub is_cancelled: bool,
    pub cancellation_reason: Option<String>,
    pub meeting_link: Option<String>,
    pub send_reminder: bool,
    pub user_id: i64,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location,
            is_confirmed: row.is_confirmed.into(),
            is_cancelled: row.is_cancelled.into(),
            cancellation_reason: row.cancellation_reason,
            meeting_link: row.meeting_link,
            send_reminder: row.send_reminder.into(),
            user_id: row.user_id,
            user_email: row.user_email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub two_factor_enabled: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// What a one-time token in `auth_tokens` may be redeemed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
    TwoFactor,
}

impl TokenPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
            TokenPurpose::TwoFactor => "two_factor",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAuthToken {
    pub id: i64,
    pub user_id: i64,
    pub purpose: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmailLog {
    pub id: i64,
    pub to_addresses: String,
    pub bcc_addresses: Option<String>,
    pub from_name: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
    pub sent_date: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub full_user_name: Option<String>,
    pub is_body_html: bool,
    pub resent_email: bool,
    pub error_message: Option<String>,
}

impl From<DbEmailLog> for EmailLog {
    fn from(row: DbEmailLog) -> Self {
        EmailLog {
            id: row.id,
            to_addresses: row.to_addresses,
            bcc_addresses: row.bcc_addresses,
            from_name: row.from_name,
            from_address: row.from_address,
            subject: row.subject,
            body: row.body,
            sent_date: row.sent_date,
            user_id: row.user_id,
            full_user_name: row.full_user_name,
            is_body_html: row.is_body_html,
            resent_email: row.resent_email,
            error_message: row.error_message,
        }
    }
}

/// Row to insert into `email_logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailLog {
    pub to_addresses: String,
    pub bcc_addresses: Option<String>,
    pub from_name: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
    pub user_id: Option<i64>,
    pub full_user_name: Option<String>,
    pub is_body_html: bool,
    pub error_message: Option<String>,
}
