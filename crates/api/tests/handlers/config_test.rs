use std::collections::HashMap;

use agenda_api::config::ApiConfig;
use chrono::{NaiveTime, Weekday};
use pretty_assertions::assert_eq;
use tracing::Level;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/agenda")])).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.statistics_max_range_days, 366);
    assert_eq!(
        config.business_hours.days,
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    );
    assert_eq!(config.business_hours.start, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    assert_eq!(config.business_hours.end, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    assert_eq!(config.mail_from_name, "Agenda");
}

#[test]
fn test_overrides() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/agenda"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://agenda.example ,"),
        ("BUSINESS_DAYS", "1,3,5"),
        ("BUSINESS_HOURS_START", "08:30"),
        ("BUSINESS_HOURS_END", "17:00"),
        ("STATISTICS_MAX_RANGE_DAYS", "31"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://agenda.example".to_string()
        ])
    );
    assert_eq!(config.business_hours.days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    assert_eq!(config.business_hours.start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    assert_eq!(config.statistics_max_range_days, 31);
}

#[test]
fn test_database_url_is_required() {
    let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(err.to_string().contains("DATABASE_URL"));
}

#[test]
fn test_rejects_bad_values() {
    assert!(ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "x"), ("API_PORT", "http")])).is_err());
    assert!(
        ApiConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "x"),
            ("BUSINESS_HOURS_START", "14:00"),
            ("BUSINESS_HOURS_END", "09:00"),
        ]))
        .is_err()
    );
}
