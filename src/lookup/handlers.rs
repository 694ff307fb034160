use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::CityKey;
use super::service::LookupError;
use crate::extractors::CityParam;
use crate::forecast::ForecastSource;
use crate::presentation::WeatherView;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub forecast_source: ForecastSource,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.lookup.backend_name().to_string(),
        forecast_source: state.forecast_service.source(),
    })
}

/// Current weather with display attributes, outside the dashboard flow
///
/// GET /weather/{city}
/// GET /weather?city=Delhi
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<WeatherView>, LookupError> {
    let key = CityKey::new(&city.or_default(state.config.default_city.as_str()));
    let snapshot = state.lookup.resolve_key(&key).await?;

    Ok(Json(state.presentation.weather_view(&snapshot)))
}
