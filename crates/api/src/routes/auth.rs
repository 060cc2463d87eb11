use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/login-2fa", post(handlers::auth::login_two_factor))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/verify-email", post(handlers::auth::verify_email))
        .route("/api/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/api/auth/reset-password", post(handlers::auth::reset_password))
}
