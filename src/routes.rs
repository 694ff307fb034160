use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard_handlers;
use crate::forecast::handlers as forecast_handlers;
use crate::lookup::handlers as lookup_handlers;
use crate::openapi::swagger_ui;
use crate::AppState;

/// Search, selection and the committed view
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/dashboard/search", post(dashboard_handlers::search))
        .route(
            "/dashboard/select/{city}",
            post(dashboard_handlers::select_city),
        )
        .route("/cities", get(dashboard_handlers::list_cities))
        .route("/clock", get(dashboard_handlers::clock))
}

fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(lookup_handlers::get_weather))
        .route("/weather/{city}", get(lookup_handlers::get_weather))
}

fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(forecast_handlers::get_forecast))
        .route("/forecast/{city}", get(forecast_handlers::get_forecast))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard_routes())
        .merge(weather_routes())
        .merge(forecast_routes())
}

/// Build the complete application router
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(lookup_handlers::health))
        .route("/health", get(lookup_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .merge(swagger_ui())
}
