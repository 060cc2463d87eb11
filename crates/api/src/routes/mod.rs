pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod health;
