use std::sync::Arc;

use agenda_core::models::auth::{
    AuthOutcome, DEFAULT_ROLE, LoginOutcome, RegisterRequest, SessionToken, SessionUser,
};
use agenda_core::models::email::EmailMessage;
use agenda_db::models::{DbUser, TokenPurpose};
use agenda_db::repositories::{auth_token, session, user};
use agenda_db::DbPool;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use eyre::Result;
use tracing::{info, warn};

use crate::middleware::auth::{
    generate_numeric_code, generate_reset_token, generate_session_token, hash_password,
    verify_password,
};
use crate::services::email::EmailSender;

pub const INVALID_LOGIN: &str = "Invalid login attempt";
pub const INVALID_CODE: &str = "Invalid verification code";
pub const INVALID_RESET_TOKEN: &str = "Invalid password reset token";
pub const EMAIL_NOT_CONFIRMED: &str = "Email address has not been verified";

/// Session lifetime without "remember me".
pub const SESSION_TTL_HOURS: i64 = 12;
/// Session lifetime with "remember me".
pub const REMEMBERED_SESSION_TTL_DAYS: i64 = 30;

const TWO_FACTOR_TTL_MINUTES: i64 = 10;
const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;
const PASSWORD_RESET_TTL_HOURS: i64 = 1;
const CODE_DIGITS: usize = 6;

/// Identity operations behind the auth endpoints and the session extractor.
///
/// Expected failures (bad credentials, expired codes) come back as
/// unsuccessful outcomes; `Err` is reserved for infrastructure failures.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Password step. Succeeds without roles when a second factor is pending.
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<LoginOutcome>;

    async fn login_two_factor(
        &self,
        email: &str,
        password: &str,
        code: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome>;

    async fn logout(&self, token: &str) -> Result<()>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthOutcome>;

    async fn verify_email(&self, email: &str, code: &str) -> Result<AuthOutcome>;

    /// Sends reset instructions when the account exists. Silent otherwise.
    async fn forgot_password(&self, email: &str) -> Result<()>;

    async fn reset_password(&self, email: &str, token: &str, password: &str) -> Result<AuthOutcome>;

    /// The user behind an unexpired session token.
    async fn resolve_session(&self, token: &str) -> Result<Option<SessionUser>>;
}

/// Postgres-backed identity provider with Argon2 password hashes and
/// emailed one-time codes.
pub struct PgIdentityProvider {
    pool: DbPool,
    mailer: Arc<dyn EmailSender>,
}

impl PgIdentityProvider {
    pub fn new(pool: DbPool, mailer: Arc<dyn EmailSender>) -> Self {
        Self { pool, mailer }
    }

    fn session_expiry(remember_me: bool) -> chrono::DateTime<Utc> {
        if remember_me {
            Utc::now() + Duration::days(REMEMBERED_SESSION_TTL_DAYS)
        } else {
            Utc::now() + Duration::hours(SESSION_TTL_HOURS)
        }
    }

    /// Looks the user up and checks the password and email confirmation.
    async fn check_credentials(&self, email: &str, password: &str) -> Result<Result<DbUser, String>> {
        let Some(found) = user::get_user_by_email(&self.pool, email).await? else {
            warn!("Login attempt for unknown email");
            return Ok(Err(INVALID_LOGIN.to_string()));
        };

        if !verify_password(password, &found.password_hash)? {
            warn!(user_id = found.id, "Login attempt with wrong password");
            return Ok(Err(INVALID_LOGIN.to_string()));
        }

        if !found.email_confirmed {
            return Ok(Err(EMAIL_NOT_CONFIRMED.to_string()));
        }

        Ok(Ok(found))
    }

    async fn issue_session(&self, found: &DbUser, remember_me: bool) -> Result<LoginOutcome> {
        let expires_at = Self::session_expiry(remember_me);
        let stored = session::create_session(&self.pool, &generate_session_token(), found.id, expires_at).await?;

        // Expired rows are pruned opportunistically on sign-in
        session::delete_expired_sessions(&self.pool).await?;

        // A completed login always carries at least one role
        let roles = if found.roles.is_empty() {
            vec![DEFAULT_ROLE.to_string()]
        } else {
            found.roles.clone()
        };

        info!(user_id = found.id, remember_me, "Session issued");
        Ok(LoginOutcome {
            outcome: AuthOutcome::success(),
            roles,
            session: Some(SessionToken {
                token: stored.token,
                expires_at: stored.expires_at,
            }),
        })
    }

    async fn send_code(&self, found: &DbUser, purpose: TokenPurpose, subject: &str, body: String, ttl: Duration) -> Result<()> {
        let code = match purpose {
            TokenPurpose::PasswordReset => generate_reset_token(),
            TokenPurpose::EmailVerification | TokenPurpose::TwoFactor => generate_numeric_code(CODE_DIGITS),
        };
        auth_token::create_auth_token(&self.pool, found.id, purpose, &code, Utc::now() + ttl).await?;

        let message = EmailMessage::plain(found.email.clone(), subject, body.replace("{code}", &code))
            .for_user(found.id, found.name.clone());
        self.mailer.send(&message).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<LoginOutcome> {
        let found = match self.check_credentials(email, password).await? {
            Ok(found) => found,
            Err(reason) => return Ok(LoginOutcome::failed(reason)),
        };

        if !found.two_factor_enabled {
            return self.issue_session(&found, remember_me).await;
        }

        self.send_code(
            &found,
            TokenPurpose::TwoFactor,
            "Your sign-in code",
            "Your sign-in code is {code}. It expires in 10 minutes.".to_string(),
            Duration::minutes(TWO_FACTOR_TTL_MINUTES),
        )
        .await?;

        info!(user_id = found.id, "Two-factor code sent");
        Ok(LoginOutcome {
            outcome: AuthOutcome::success(),
            roles: Vec::new(),
            session: None,
        })
    }

    async fn login_two_factor(
        &self,
        email: &str,
        password: &str,
        code: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome> {
        let found = match self.check_credentials(email, password).await? {
            Ok(found) => found,
            Err(reason) => return Ok(LoginOutcome::failed(reason)),
        };

        if !auth_token::consume_auth_token(&self.pool, found.id, TokenPurpose::TwoFactor, code).await? {
            warn!(user_id = found.id, "Rejected two-factor code");
            return Ok(LoginOutcome::failed(INVALID_CODE));
        }

        self.issue_session(&found, remember_me).await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        if session::delete_session(&self.pool, token).await? {
            info!("Session ended");
        }
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthOutcome> {
        if user::get_user_by_email(&self.pool, &request.email).await?.is_some() {
            return Ok(AuthOutcome::failure(format!(
                "Email '{}' is already taken.",
                request.email.trim()
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let created = user::create_user(&self.pool, &request.email, &request.full_name(), &password_hash).await?;
        info!(user_id = created.id, "User registered");

        let sent = self
            .send_code(
                &created,
                TokenPurpose::EmailVerification,
                "Confirm your email",
                "Welcome! Your email verification code is {code}.".to_string(),
                Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            )
            .await;

        // Without a code the account could never be verified, so drop it and
        // let the caller register again.
        if let Err(e) = sent {
            warn!(user_id = created.id, "Verification code not sent, removing account: {:?}", e);
            user::delete_user(&self.pool, created.id).await?;
            return Err(e);
        }

        Ok(AuthOutcome::success())
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<AuthOutcome> {
        let Some(found) = user::get_user_by_email(&self.pool, email).await? else {
            return Ok(AuthOutcome::failure(INVALID_CODE));
        };

        if found.email_confirmed {
            return Ok(AuthOutcome::success());
        }

        if !auth_token::consume_auth_token(&self.pool, found.id, TokenPurpose::EmailVerification, code).await? {
            return Ok(AuthOutcome::failure(INVALID_CODE));
        }

        user::mark_email_confirmed(&self.pool, found.id).await?;
        info!(user_id = found.id, "Email verified");
        Ok(AuthOutcome::success())
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        let Some(found) = user::get_user_by_email(&self.pool, email).await? else {
            return Ok(());
        };

        self.send_code(
            &found,
            TokenPurpose::PasswordReset,
            "Reset your password",
            "Use this token to reset your password: {code}. It expires in 1 hour.".to_string(),
            Duration::hours(PASSWORD_RESET_TTL_HOURS),
        )
        .await
    }

    async fn reset_password(&self, email: &str, token: &str, password: &str) -> Result<AuthOutcome> {
        let Some(found) = user::get_user_by_email(&self.pool, email).await? else {
            return Ok(AuthOutcome::failure(INVALID_RESET_TOKEN));
        };

        if !auth_token::consume_auth_token(&self.pool, found.id, TokenPurpose::PasswordReset, token).await? {
            return Ok(AuthOutcome::failure(INVALID_RESET_TOKEN));
        }

        user::update_password_hash(&self.pool, found.id, &hash_password(password)?).await?;
        let ended = session::delete_user_sessions(&self.pool, found.id).await?;
        info!(user_id = found.id, ended_sessions = ended, "Password reset");
        Ok(AuthOutcome::success())
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<SessionUser>> {
        let Some(active) = session::get_active_session(&self.pool, token).await? else {
            return Ok(None);
        };

        Ok(user::get_user_by_id(&self.pool, active.user_id)
            .await?
            .map(|found| SessionUser {
                user_id: found.id,
                email: found.email,
                name: found.name,
                roles: found.roles,
            }))
    }
}
