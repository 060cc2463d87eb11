use std::sync::Arc;

use agenda_core::models::auth::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    TwoFactorLoginRequest, VerifyEmailRequest,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::error;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

pub const REGISTERED: &str = "Registration successful! Please check your email to verify your account.";
pub const EMAIL_VERIFIED: &str = "Email verified successfully! You can now log in.";
pub const RESET_SENT: &str = "If an account with that email exists, we've sent password reset instructions.";
pub const PASSWORD_RESET: &str = "Password reset successfully! You can now log in with your new password.";

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let response = match state
        .identity
        .login(&payload.email, &payload.password, payload.remember_me)
        .await
    {
        Ok(outcome) => AuthResponse::from_login(outcome, "Login failed"),
        Err(e) => {
            error!("Error during login: {:?}", e);
            AuthResponse::error("An error occurred during login. Please try again.")
        }
    };

    Ok(Json(response))
}

pub async fn login_two_factor(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TwoFactorLoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let response = match state
        .identity
        .login_two_factor(&payload.email, &payload.password, &payload.code, payload.remember_me)
        .await
    {
        Ok(outcome) => AuthResponse::from_login(outcome, "Two-factor authentication failed"),
        Err(e) => {
            error!("Error during 2FA login: {:?}", e);
            AuthResponse::error("An error occurred during authentication. Please try again.")
        }
    };

    Ok(Json(response))
}

pub async fn logout(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Json<AuthResponse> {
    if let Err(e) = state.identity.logout(&current.token).await {
        // The client discards its token either way
        error!("Error during logout: {:?}", e);
    }

    Json(AuthResponse {
        success: true,
        ..AuthResponse::default()
    })
}

pub async fn register(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let response = match state.identity.register(&payload).await {
        Ok(outcome) => AuthResponse::from_outcome(outcome, Some(REGISTERED)),
        Err(e) => {
            error!("Error during registration: {:?}", e);
            AuthResponse::error("An error occurred during registration. Please try again.")
        }
    };

    Ok(Json(response))
}

pub async fn verify_email(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<VerifyEmailRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let response = match state.identity.verify_email(&payload.email, &payload.token).await {
        Ok(outcome) => AuthResponse::from_outcome(outcome, Some(EMAIL_VERIFIED)),
        Err(e) => {
            error!("Error during email verification: {:?}", e);
            AuthResponse::error("An error occurred during email verification. Please try again.")
        }
    };

    Ok(Json(response))
}

/// Answers the same way whether or not the account exists.
pub async fn forgot_password(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    if let Err(e) = state.identity.forgot_password(&payload.email).await {
        // Same answer as success so account existence is not revealed
        error!("Error during forgot password: {:?}", e);
    }

    Ok(Json(AuthResponse {
        success: true,
        message: Some(RESET_SENT.to_string()),
        ..AuthResponse::default()
    }))
}

pub async fn reset_password(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let response = match state
        .identity
        .reset_password(&payload.email, &payload.token, &payload.password)
        .await
    {
        Ok(outcome) => AuthResponse::from_outcome(outcome, Some(PASSWORD_RESET)),
        Err(e) => {
            error!("Error during password reset: {:?}", e);
            AuthResponse::error("An error occurred during password reset. Please try again.")
        }
    };

    Ok(Json(response))
}
