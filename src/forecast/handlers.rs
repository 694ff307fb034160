use axum::{extract::State, Json};

use super::models::ForecastResponse;
use crate::extractors::CityParam;
use crate::lookup::{CityKey, LookupError};
use crate::AppState;

/// Five-day forecast for a city, or the default city when none is given
///
/// GET /forecast/{city}
/// GET /forecast?city=Pune
pub async fn get_forecast(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<ForecastResponse>, LookupError> {
    let key = CityKey::new(&city.or_default(state.config.default_city.as_str()));
    let snapshot = state.lookup.resolve_key(&key).await?;

    let reference_time = chrono::Utc::now().timestamp();
    let forecast = state
        .forecast_service
        .forecast_for(&key, &snapshot, reference_time)
        .await?;
    let days = state
        .presentation
        .forecast_days(&forecast, state.timezone);

    Ok(Json(ForecastResponse {
        city: key.to_string(),
        snapshot,
        forecast: days,
    }))
}
