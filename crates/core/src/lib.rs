//! # Agenda Core
//!
//! Domain types and pure logic shared by the database and API crates:
//! appointment models and their calendar projection, wire date formats,
//! date-range resolution, business hours, the dashboard statistics, and the
//! interaction model of the calendar page.

pub mod business_hours;
pub mod calendar_view;
pub mod date_range;
pub mod datetime;
pub mod errors;
pub mod models;
pub mod statistics;
