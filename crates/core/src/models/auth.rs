use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AgendaError, AgendaResult};

/// Minimum accepted password length for registration and resets.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Role granted to every account after a completed login.
pub const DEFAULT_ROLE: &str = "User";

fn require_email(email: &str) -> AgendaResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AgendaError::validation("A valid email address is required")),
    }
}

fn require_present(value: &str, field: &str) -> AgendaResult<()> {
    if value.trim().is_empty() {
        return Err(AgendaError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_password(password: &str) -> AgendaResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AgendaError::validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)?;
        require_present(&self.password, "Password")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default)]
    pub code: String,
}

impl TwoFactorLoginRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)?;
        require_present(&self.password, "Password")?;
        require_present(&self.code, "Verification code")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)?;
        require_password(&self.password)?;
        require_present(&self.first_name, "First name")?;
        require_present(&self.last_name, "Last name")
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

impl VerifyEmailRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)?;
        require_present(&self.token, "Verification code")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> AgendaResult<()> {
        require_email(&self.email)?;
        require_present(&self.token, "Reset token")?;
        require_password(&self.password)
    }
}

/// Success flag plus the user-facing reasons for a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub succeeded: bool,
    pub errors: Vec<String>,
}

impl AuthOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            errors: vec![error.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a password (or password plus code) login.
///
/// A successful first step without roles means a second factor is still
/// required; roles are only granted once a session has been issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOutcome {
    pub outcome: AuthOutcome,
    pub roles: Vec<String>,
    pub session: Option<SessionToken>,
}

impl LoginOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            outcome: AuthOutcome::failure(error),
            ..Self::default()
        }
    }

    pub fn requires_two_factor(&self) -> bool {
        self.outcome.succeeded && self.roles.is_empty()
    }
}

/// The authenticated caller, resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

/// Wire body of every auth endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub requires_two_factor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl AuthResponse {
    pub fn from_outcome(outcome: AuthOutcome, message: Option<&str>) -> Self {
        Self {
            success: outcome.succeeded,
            message: if outcome.succeeded { message.map(str::to_string) } else { None },
            errors: outcome.errors,
            ..Self::default()
        }
    }

    pub fn from_login(login: LoginOutcome, fallback_error: &str) -> Self {
        if !login.outcome.succeeded {
            let errors = if login.outcome.errors.is_empty() {
                vec![fallback_error.to_string()]
            } else {
                login.outcome.errors
            };
            return Self {
                success: false,
                errors,
                ..Self::default()
            };
        }

        let requires_two_factor = login.roles.is_empty();
        Self {
            success: true,
            requires_two_factor,
            token: login.session.as_ref().map(|s| s.token.clone()),
            expires_at: login.session.as_ref().map(|s| s.expires_at),
            ..Self::default()
        }
    }

    /// Failure carrying a single generic message, used when the identity
    /// provider itself errored.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![message.into()],
            ..Self::default()
        }
    }
}
