//! # Authentication Module
//!
//! Password hashing, one-time code generation, and the [`CurrentUser`]
//! extractor that turns an `Authorization: Bearer <token>` header into the
//! signed-in user.

use std::sync::Arc;

use agenda_core::errors::AgendaError;
use agenda_core::models::auth::SessionUser;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use eyre::Result;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated per call and the result is returned in
/// PHC string format (algorithm, version, parameters, salt and hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Opaque bearer token for a new session.
pub fn generate_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Numeric code of `digits` length, sent by email for verification and 2FA.
pub fn generate_numeric_code(digits: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..digits)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// URL-safe token for password reset links.
pub fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(40)
        .map(char::from)
        .collect()
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// The signed-in caller. Handlers that take this extractor reject anonymous
/// requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError(AgendaError::Authentication("Missing session token".into())))?
            .to_string();

        match state.identity.resolve_session(&token).await? {
            Some(user) => {
                tracing::debug!(user_id = user.user_id, "Session resolved");
                Ok(CurrentUser { user, token })
            }
            None => Err(AppError(AgendaError::Authentication(
                "Invalid or expired session".into(),
            ))),
        }
    }
}
