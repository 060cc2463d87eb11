pub mod calendar;
pub mod dashboard;
pub mod email;
pub mod identity;
pub mod statistics;
