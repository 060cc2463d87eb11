//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where a sensible one exists.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `BUSINESS_DAYS`: Comma-separated weekdays, 0 = Sunday (default: "1,2,3,4,5")
//! - `BUSINESS_HOURS_START` / `BUSINESS_HOURS_END`: `HH:mm` (default: 07:00 / 13:00)
//! - `STATISTICS_MAX_RANGE_DAYS`: Longest statistics range accepted (default: 366)
//! - `MAIL_FROM_NAME` / `MAIL_FROM_ADDRESS`: Sender recorded on outgoing mail

use agenda_core::business_hours::BusinessHours;
use agenda_core::date_range::DEFAULT_MAX_RANGE_DAYS;
use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the Agenda API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use agenda_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Opening hours used for occupancy percentages
    pub business_hours: BusinessHours,

    /// Longest statistics range, in days
    pub statistics_max_range_days: i64,

    pub mail_from_name: String,
    pub mail_from_address: String,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The business hours are malformed or start after they end
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| eyre::eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30").parse().unwrap_or(30);

        // Scheduling settings
        let defaults = BusinessHours::default();
        let days = match lookup("BUSINESS_DAYS") {
            Some(days) => BusinessHours::parse_days(&days).wrap_err("Invalid BUSINESS_DAYS value")?,
            None => defaults.days,
        };
        let start = match lookup("BUSINESS_HOURS_START") {
            Some(start) => BusinessHours::parse_time(&start).wrap_err("Invalid BUSINESS_HOURS_START value")?,
            None => defaults.start,
        };
        let end = match lookup("BUSINESS_HOURS_END") {
            Some(end) => BusinessHours::parse_time(&end).wrap_err("Invalid BUSINESS_HOURS_END value")?,
            None => defaults.end,
        };
        let business_hours = BusinessHours::new(days, start, end).wrap_err("Invalid business hours")?;

        let statistics_max_range_days = match lookup("STATISTICS_MAX_RANGE_DAYS") {
            Some(days) => days.parse().wrap_err("Invalid STATISTICS_MAX_RANGE_DAYS value")?,
            None => DEFAULT_MAX_RANGE_DAYS,
        };

        // Mail settings
        let mail_from_name = var("MAIL_FROM_NAME", "Agenda");
        let mail_from_address = var("MAIL_FROM_ADDRESS", "no-reply@agenda.local");

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            business_hours,
            statistics_max_range_days,
            mail_from_name,
            mail_from_address,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
