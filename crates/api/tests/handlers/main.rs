//! Router-level tests. Requests go through the full axum stack with an
//! in-memory appointment store and a mocked identity provider.

#[path = "../test_utils.rs"]
mod test_utils;

mod calendar_test;
mod config_test;
mod dashboard_test;
mod middleware_test;
