use chrono::Timelike;
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use super::orchestrator::{CommittedState, QueryState};
use crate::forecast::ForecastDayView;
use crate::lookup::ErrorKind;
use crate::presentation::{PresentationAdapter, SkyTheme, WeatherView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DashboardStatus {
    Idle,
    Pending,
    Success,
    Failed,
}

/// Everything a renderer needs for one committed dashboard state
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub sequence: u64,
    pub status: DashboardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherView>,
    pub forecast: Vec<ForecastDayView>,
    pub theme: SkyTheme,
}

impl DashboardView {
    /// Compose the view for a committed state at local time `now`
    pub fn compose(
        committed: &CommittedState,
        adapter: &PresentationAdapter,
        now: chrono::DateTime<Tz>,
    ) -> Self {
        let city = committed.state.city().map(|c| c.to_string());
        let mut view = Self {
            sequence: committed.sequence,
            status: DashboardStatus::Idle,
            city,
            error: None,
            weather: None,
            forecast: Vec::new(),
            theme: SkyTheme::select(None, now.hour()),
        };

        match &committed.state {
            QueryState::Idle => {}
            QueryState::Pending { .. } => view.status = DashboardStatus::Pending,
            QueryState::Failed { error, .. } => {
                view.status = DashboardStatus::Failed;
                view.error = Some(*error);
            }
            QueryState::Success {
                snapshot, forecast, ..
            } => {
                view.status = DashboardStatus::Success;
                view.weather = Some(adapter.weather_view(snapshot));
                view.forecast = adapter.forecast_days(forecast, now.timezone());
                view.theme = SkyTheme::select(Some(snapshot.condition), now.hour());
            }
        }

        view
    }
}
