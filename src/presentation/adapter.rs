use chrono::TimeZone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::details::{health_advisories, WeatherDetails};
use crate::forecast::{Forecast, ForecastDayView};
use crate::lookup::{Condition, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum TemperatureBand {
    #[serde(rename = "very hot")]
    VeryHot,
    #[serde(rename = "hot")]
    Hot,
    #[serde(rename = "warm")]
    Warm,
    #[serde(rename = "mild")]
    Mild,
    #[serde(rename = "cool")]
    Cool,
}

impl TemperatureBand {
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature > 35.0 {
            Self::VeryHot
        } else if temperature > 30.0 {
            Self::Hot
        } else if temperature > 25.0 {
            Self::Warm
        } else if temperature > 15.0 {
            Self::Mild
        } else {
            Self::Cool
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Rain,
    HeatWarning,
    HeatCaution,
    CoolWeather,
    Pleasant,
}

impl Advisory {
    /// First match wins: wet conditions, then heat, then cold.
    pub fn select(condition: Condition, temperature: f64) -> Self {
        if condition.is_wet() {
            Self::Rain
        } else if temperature > 35.0 {
            Self::HeatWarning
        } else if temperature > 30.0 {
            Self::HeatCaution
        } else if temperature < 15.0 {
            Self::CoolWeather
        } else {
            Self::Pleasant
        }
    }
}

/// Advisory wording, overridable from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryTexts {
    #[serde(default = "default_rain")]
    pub rain: String,
    #[serde(default = "default_heat_warning")]
    pub heat_warning: String,
    #[serde(default = "default_heat_caution")]
    pub heat_caution: String,
    #[serde(default = "default_cool_weather")]
    pub cool_weather: String,
    #[serde(default = "default_pleasant")]
    pub pleasant: String,
}

fn default_rain() -> String {
    "Carry an umbrella! Perfect weather for hot chai.".to_string()
}

fn default_heat_warning() -> String {
    "Very hot! Stay hydrated and avoid direct sunlight.".to_string()
}

fn default_heat_caution() -> String {
    "Hot weather! Use sunscreen and stay cool.".to_string()
}

fn default_cool_weather() -> String {
    "Cool weather! Perfect for outdoor activities.".to_string()
}

fn default_pleasant() -> String {
    "Pleasant weather! Enjoy your day!".to_string()
}

impl Default for AdvisoryTexts {
    fn default() -> Self {
        Self {
            rain: default_rain(),
            heat_warning: default_heat_warning(),
            heat_caution: default_heat_caution(),
            cool_weather: default_cool_weather(),
            pleasant: default_pleasant(),
        }
    }
}

impl AdvisoryTexts {
    pub fn text(&self, advisory: Advisory) -> &str {
        match advisory {
            Advisory::Rain => &self.rain,
            Advisory::HeatWarning => &self.heat_warning,
            Advisory::HeatCaution => &self.heat_caution,
            Advisory::CoolWeather => &self.cool_weather,
            Advisory::Pleasant => &self.pleasant,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DisplayAttributes {
    pub temperature_band: TemperatureBand,
    pub advisory: Advisory,
    pub advisory_text: String,
    /// Temperature rounded for display
    pub temperature_rounded: i64,
    pub feels_like_rounded: i64,
}

/// Primary card plus details panel for one snapshot
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherView {
    pub snapshot: WeatherSnapshot,
    pub display: DisplayAttributes,
    pub details: WeatherDetails,
    pub health_advisories: Vec<String>,
}

/// Maps snapshots and forecasts into display attributes. Pure and total.
#[derive(Debug, Clone, Default)]
pub struct PresentationAdapter {
    texts: AdvisoryTexts,
}

impl PresentationAdapter {
    pub fn new(texts: AdvisoryTexts) -> Self {
        Self { texts }
    }

    pub fn derive(&self, snapshot: &WeatherSnapshot) -> DisplayAttributes {
        let advisory = Advisory::select(snapshot.condition, snapshot.temperature);

        DisplayAttributes {
            temperature_band: TemperatureBand::from_celsius(snapshot.temperature),
            advisory,
            advisory_text: self.texts.text(advisory).to_string(),
            temperature_rounded: snapshot.temperature.round() as i64,
            feels_like_rounded: snapshot.feels_like.round() as i64,
        }
    }

    pub fn weather_view(&self, snapshot: &WeatherSnapshot) -> WeatherView {
        WeatherView {
            snapshot: snapshot.clone(),
            display: self.derive(snapshot),
            details: WeatherDetails::from_snapshot(snapshot),
            health_advisories: health_advisories(snapshot),
        }
    }

    /// Forecast strip entries labelled in the given timezone
    pub fn forecast_days(&self, forecast: &Forecast, timezone: Tz) -> Vec<ForecastDayView> {
        forecast
            .entries()
            .iter()
            .map(|entry| ForecastDayView {
                timestamp: entry.timestamp,
                label: day_label(entry.timestamp, timezone),
                temperature: entry.temperature,
                temperature_rounded: entry.temperature.round() as i64,
                condition: entry.condition,
                description: entry.description.clone(),
            })
            .collect()
    }
}

/// "Mon, 20 Oct" style label; empty when the timestamp is out of range
fn day_label(timestamp: i64, timezone: Tz) -> String {
    timezone
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%a, %-d %b").to_string())
        .unwrap_or_default()
}
