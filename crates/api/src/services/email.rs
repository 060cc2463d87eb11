use agenda_core::models::email::{EmailLog, EmailMessage};
use agenda_db::models::NewEmailLog;
use agenda_db::repositories::email_log;
use agenda_db::DbPool;
use async_trait::async_trait;
use eyre::Result;
use tracing::info;

/// Outgoing mail boundary used by the identity flows.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Dispatches `message` and returns the audit record written for it.
    async fn send(&self, message: &EmailMessage) -> Result<EmailLog>;
}

/// Mailer without a transport: every message is logged through `tracing`
/// and recorded in `email_logs`, where operators can read codes and links.
#[derive(Debug, Clone)]
pub struct LoggingMailer {
    pool: DbPool,
    from_name: String,
    from_address: String,
}

impl LoggingMailer {
    pub fn new(pool: DbPool, from_name: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            pool,
            from_name: from_name.into(),
            from_address: from_address.into(),
        }
    }

    fn audit_row(&self, message: &EmailMessage) -> NewEmailLog {
        NewEmailLog {
            to_addresses: message.to.join(";"),
            bcc_addresses: if message.bcc.is_empty() {
                None
            } else {
                Some(message.bcc.join(";"))
            },
            from_name: self.from_name.clone(),
            from_address: self.from_address.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
            user_id: message.user_id,
            full_user_name: message.full_user_name.clone(),
            is_body_html: message.is_html,
            error_message: None,
        }
    }
}

#[async_trait]
impl EmailSender for LoggingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<EmailLog> {
        info!(
            to = %message.to.join(";"),
            subject = %message.subject,
            "Sending email"
        );

        let stored = email_log::insert_email_log(&self.pool, &self.audit_row(message)).await?;
        Ok(stored.into())
    }
}
