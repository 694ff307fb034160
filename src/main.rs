mod config;
mod dashboard;
mod error;
mod extractors;
mod forecast;
mod lookup;
mod openapi;
mod presentation;
mod routes;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use chrono_tz::Tz;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, LookupBackendKind};
use crate::dashboard::SnapshotOrchestrator;
use crate::forecast::{ForecastService, ForecastSynthesizer};
use crate::lookup::{LookupBackend, RemoteLookup, TableLookup, WeatherLookupService};
use crate::presentation::PresentationAdapter;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Request timeout for the whole router
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SnapshotOrchestrator>,
    pub lookup: Arc<WeatherLookupService>,
    pub forecast_service: Arc<ForecastService>,
    pub presentation: Arc<PresentationAdapter>,
    pub timezone: Tz,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services around a lookup backend
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn LookupBackend>,
    ) -> Result<Self, ::config::ConfigError> {
        let timezone = config.timezone()?;

        let lookup = Arc::new(WeatherLookupService::new(backend));
        let synthesizer =
            ForecastSynthesizer::new(config.forecast.variation_min, config.forecast.variation_max);
        let forecast_service = Arc::new(ForecastService::new(
            Arc::clone(&lookup),
            synthesizer,
            config.forecast.source,
        ));
        let orchestrator = Arc::new(SnapshotOrchestrator::new(
            Arc::clone(&lookup),
            Arc::clone(&forecast_service),
        ));
        let presentation = Arc::new(PresentationAdapter::new(config.advisories.clone()));

        Ok(Self {
            orchestrator,
            lookup,
            forecast_service,
            presentation,
            timezone,
            config: Arc::new(config),
        })
    }
}

/// Create shared HTTP client with connection pooling
fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Build the configured lookup backend
fn create_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn LookupBackend>> {
    match config.backend {
        LookupBackendKind::Table => {
            let latency = Duration::from_millis(config.table_latency_ms);
            let table = TableLookup::load(config.table_path.as_deref(), latency)?;
            Ok(Arc::new(table))
        }
        LookupBackendKind::Remote => {
            let api_key = config
                .api_key()
                .ok_or_else(|| anyhow::anyhow!("openweathermap_api_key is not set"))?;
            let client = create_http_client()?;
            tracing::debug!("Shared HTTP client created");
            Ok(Arc::new(RemoteLookup::new(
                client,
                api_key,
                &config.openweathermap_base_url,
            )))
        }
    }
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citycast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        backend = ?config.backend,
        forecast_source = ?config.forecast.source,
        timezone = %config.display_timezone,
        "Configuration loaded successfully"
    );

    let backend = create_backend(&config)?;
    let addr = format!("{}:{}", config.host, config.port);
    let default_city = config.default_city.clone();
    let state = AppState::new(config, backend)?;

    // Initial dashboard load
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::spawn(async move {
        let committed = orchestrator.request(&default_city).await;
        tracing::info!(
            sequence = committed.sequence,
            city = %default_city,
            "Initial dashboard load finished"
        );
    });

    let app = routes::build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
