use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::lookup::{Condition, WeatherSnapshot};

/// Number of days in every forecast
pub const FORECAST_DAYS: usize = 5;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Where forecasts come from once a snapshot is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    /// Synthesized from the snapshot temperature
    #[default]
    Synthetic,
    /// Provider forecast endpoint, when the backend has one
    Provider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    /// Seconds since epoch
    pub timestamp: i64,
    /// Degrees Celsius
    pub temperature: f64,
    pub condition: Condition,
    pub description: String,
}

/// Exactly five daily entries, one day apart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Forecast {
    entries: [ForecastEntry; FORECAST_DAYS],
}

impl Forecast {
    pub fn new(entries: [ForecastEntry; FORECAST_DAYS]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }
}

impl TryFrom<Vec<ForecastEntry>> for Forecast {
    type Error = Vec<ForecastEntry>;

    fn try_from(entries: Vec<ForecastEntry>) -> Result<Self, Self::Error> {
        <[ForecastEntry; FORECAST_DAYS]>::try_from(entries).map(Self::new)
    }
}

// ============================================================================
// API Response Models
// ============================================================================

/// One forecast day as shown in the forecast strip
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastDayView {
    pub timestamp: i64,
    /// Short day label in the display timezone, e.g. "Mon, 20 Oct"
    pub label: String,
    pub temperature: f64,
    /// Temperature rounded for display
    pub temperature_rounded: i64,
    pub condition: Condition,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub city: String,
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastDayView>,
}
