pub mod handlers;
mod models;
mod service;
mod synthesizer;

pub use models::{
    Forecast, ForecastDayView, ForecastEntry, ForecastResponse, ForecastSource, FORECAST_DAYS,
    SECONDS_PER_DAY,
};
pub use service::ForecastService;
pub use synthesizer::{ForecastSynthesizer, MAX_VARIATION};
