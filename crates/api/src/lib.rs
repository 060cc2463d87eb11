//! # Agenda API
//!
//! HTTP server for the Agenda appointment scheduler: the calendar event
//! endpoints, the dashboard statistics, and account management.
//!
//! ## Architecture
//!
//! - **Routes** map URLs to handlers
//! - **Handlers** translate requests into service calls and wrap the results
//!   in the `{success, data, message}` envelope
//! - **Services** hold the calendar adapter, the statistics aggregator, the
//!   dashboard flow and the identity provider
//! - **Middleware** resolves sessions and maps errors to status codes
//!
//! Storage is reached only through [`AppointmentStore`] and
//! [`IdentityProvider`], so the router can be driven in tests without a
//! database.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Session extraction and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Domain services behind the handlers
pub mod services;

use std::sync::Arc;

use agenda_core::business_hours::BusinessHours;
use agenda_db::{AppointmentStore, DbPool, PgAppointmentStore};
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    BoxError, Router,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::services::{
    calendar::CalendarEvents,
    dashboard::DashboardService,
    email::{EmailSender, LoggingMailer},
    identity::{IdentityProvider, PgIdentityProvider},
    statistics::StatisticsAggregator,
};

/// Shared application state that is accessible to all request handlers.
///
/// The services are cheap to build, so handlers create them per request from
/// the shared store.
pub struct ApiState {
    pub store: Arc<dyn AppointmentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub business_hours: BusinessHours,
    /// Longest range, in days, the statistics endpoints accept.
    pub max_range_days: i64,
}

impl ApiState {
    pub fn calendar(&self) -> CalendarEvents {
        CalendarEvents::new(self.store.clone())
    }

    pub fn statistics(&self) -> StatisticsAggregator {
        StatisticsAggregator::new(
            self.store.clone(),
            self.business_hours.clone(),
            self.max_range_days,
        )
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.statistics())
    }
}

/// Builds the router with every endpoint and request tracing attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::calendar::routes())
        .merge(routes::dashboard::routes())
        .merge(routes::auth::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, wires the Postgres-backed store, mailer and identity
/// provider into [`ApiState`], then serves until the listener fails.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let db_pool = agenda_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mailer: Arc<dyn EmailSender> = Arc::new(LoggingMailer::new(
        db_pool.clone(),
        config.mail_from_name.clone(),
        config.mail_from_address.clone(),
    ));

    let state = Arc::new(ApiState {
        store: Arc::new(PgAppointmentStore::new(db_pool.clone())),
        identity: Arc::new(PgIdentityProvider::new(db_pool, mailer)),
        business_hours: config.business_hours.clone(),
        max_range_days: config.statistics_max_range_days,
    });

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .wrap_err("Invalid origin in CORS_ORIGINS")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Agenda listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
