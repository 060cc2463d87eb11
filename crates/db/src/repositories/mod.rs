pub mod appointment;
pub mod auth_token;
pub mod email_log;
pub mod session;
pub mod user;
