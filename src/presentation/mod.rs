mod adapter;
mod details;

pub use adapter::{
    Advisory, AdvisoryTexts, DisplayAttributes, PresentationAdapter, TemperatureBand, WeatherView,
};
pub use details::{
    health_advisories, HumidityLevel, PressureLevel, SkyTheme, WeatherDetails, WindLevel,
};
