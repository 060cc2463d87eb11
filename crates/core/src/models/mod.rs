pub mod appointment;
pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod email;
