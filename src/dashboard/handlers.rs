use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::orchestrator::Admission;
use super::view::DashboardView;
use crate::error::HttpError;
use crate::impl_into_response;
use crate::lookup::normalize_city;
use crate::AppState;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("City name must not be empty")]
    EmptyQuery,
}

impl HttpError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyQuery => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::EmptyQuery => Some("EMPTY_QUERY"),
        }
    }
}

impl_into_response!(DashboardError);

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// City name as typed into the search box
    pub city: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchAccepted {
    pub sequence: u64,
    pub city: String,
    /// True when the request joined an identical in-flight query
    pub coalesced: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CitiesResponse {
    /// Curated cities offered for one-click selection
    pub popular: Vec<String>,
    /// Cities the active backend can resolve (empty for the remote backend)
    pub available: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockResponse {
    pub timezone: String,
    /// e.g. "03:45:12 PM"
    pub time: String,
    /// e.g. "Monday, 1 July 2024"
    pub date: String,
    pub timestamp: i64,
}

/// Search for a city
///
/// POST /api/v1/dashboard/search {"city": "Mumbai"}
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<(StatusCode, Json<SearchAccepted>), DashboardError> {
    issue(&state, &request.city)
}

/// Select one of the listed cities
///
/// POST /api/v1/dashboard/select/{city}
pub async fn select_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<(StatusCode, Json<SearchAccepted>), DashboardError> {
    issue(&state, &city)
}

/// Issue a dashboard request; completion runs on its own task
fn issue(
    state: &AppState,
    city_name: &str,
) -> Result<(StatusCode, Json<SearchAccepted>), DashboardError> {
    if city_name.trim().is_empty() {
        return Err(DashboardError::EmptyQuery);
    }

    let accepted = match state.orchestrator.begin(city_name) {
        Admission::Issued(pending) => {
            let accepted = SearchAccepted {
                sequence: pending.sequence(),
                city: pending.city().to_string(),
                coalesced: false,
            };
            let orchestrator = Arc::clone(&state.orchestrator);
            tokio::spawn(async move {
                orchestrator.complete(pending).await;
            });
            accepted
        }
        Admission::Coalesced { sequence } => SearchAccepted {
            sequence,
            city: normalize_city(city_name),
            coalesced: true,
        },
    };

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// Current dashboard view
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let committed = state.orchestrator.current();
    let now = chrono::Utc::now().with_timezone(&state.timezone);

    Json(DashboardView::compose(&committed, &state.presentation, now))
}

/// Curated and resolvable cities
///
/// GET /api/v1/cities
pub async fn list_cities(State(state): State<AppState>) -> Json<CitiesResponse> {
    let popular = state
        .config
        .popular_cities
        .iter()
        .take(state.config.popular_cities_shown)
        .cloned()
        .collect();

    Json(CitiesResponse {
        popular,
        available: state.lookup.registered_cities(),
    })
}

/// Local time in the display timezone
///
/// GET /api/v1/clock
pub async fn clock(State(state): State<AppState>) -> Json<ClockResponse> {
    let now = chrono::Utc::now().with_timezone(&state.timezone);

    Json(ClockResponse {
        timezone: state.timezone.name().to_string(),
        time: now.format("%I:%M:%S %p").to_string(),
        date: now.format("%A, %-d %B %Y").to_string(),
        timestamp: now.timestamp(),
    })
}
