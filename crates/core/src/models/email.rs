use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outgoing message handed to a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub user_id: Option<i64>,
    pub full_user_name: Option<String>,
}

impl EmailMessage {
    pub fn plain(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            bcc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
            is_html: false,
            user_id: None,
            full_user_name: None,
        }
    }

    pub fn for_user(mut self, user_id: i64, full_name: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.full_user_name = Some(full_name.into());
        self
    }
}

/// Audit record of a dispatched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLog {
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
