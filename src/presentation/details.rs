use serde::Serialize;
use utoipa::ToSchema;

use crate::lookup::{Condition, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HumidityLevel {
    High,
    Comfortable,
    Low,
}

impl HumidityLevel {
    pub fn from_percent(humidity: u8) -> Self {
        if humidity > 70 {
            Self::High
        } else if humidity > 40 {
            Self::Comfortable
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Humidity",
            Self::Comfortable => "Comfortable",
            Self::Low => "Low Humidity",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::High => "May feel sticky",
            Self::Comfortable => "Perfect conditions",
            Self::Low => "Stay hydrated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WindLevel {
    Windy,
    Breezy,
    Calm,
}

impl WindLevel {
    pub fn from_speed(speed: f64) -> Self {
        if speed > 10.0 {
            Self::Windy
        } else if speed > 5.0 {
            Self::Breezy
        } else {
            Self::Calm
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windy => "Windy",
            Self::Breezy => "Breezy",
            Self::Calm => "Calm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    High,
    Normal,
    Low,
}

impl PressureLevel {
    pub fn from_hpa(pressure: u32) -> Self {
        if pressure > 1020 {
            Self::High
        } else if pressure > 1000 {
            Self::Normal
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Pressure",
            Self::Normal => "Normal",
            Self::Low => "Low Pressure",
        }
    }
}

/// Secondary details panel
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherDetails {
    pub humidity: u8,
    pub humidity_level: HumidityLevel,
    pub humidity_label: String,
    pub wind_speed: f64,
    pub wind_level: WindLevel,
    pub wind_label: String,
    pub pressure: u32,
    pub pressure_level: PressureLevel,
    pub pressure_label: String,
}

impl WeatherDetails {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let humidity_level = HumidityLevel::from_percent(snapshot.humidity);
        let wind_level = WindLevel::from_speed(snapshot.wind_speed);
        let pressure_level = PressureLevel::from_hpa(snapshot.pressure);

        Self {
            humidity: snapshot.humidity,
            humidity_level,
            humidity_label: humidity_level.label().to_string(),
            wind_speed: snapshot.wind_speed,
            wind_level,
            wind_label: wind_level.label().to_string(),
            pressure: snapshot.pressure,
            pressure_level,
            pressure_label: pressure_level.label().to_string(),
        }
    }
}

/// Health advisory lines, in display order
pub fn health_advisories(snapshot: &WeatherSnapshot) -> Vec<String> {
    let mut advisories = vec![HumidityLevel::from_percent(snapshot.humidity)
        .advice()
        .to_string()];

    if snapshot.temperature > 30.0 {
        advisories.push("Use sunscreen SPF 30+".to_string());
    }
    if snapshot.condition.is_wet() {
        advisories.push("Monsoon season - drive carefully".to_string());
    }
    advisories.push("Drink plenty of water".to_string());

    advisories
}

/// Background theme picked from the condition and the local hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkyTheme {
    Rainy,
    CloudyNight,
    CloudyDay,
    ClearNight,
    ClearDay,
    Default,
}

impl SkyTheme {
    pub fn select(condition: Option<Condition>, hour: u32) -> Self {
        let is_night = !(6..=18).contains(&hour);

        match condition {
            Some(c) if c.is_wet() => Self::Rainy,
            Some(Condition::Clouds) if is_night => Self::CloudyNight,
            Some(Condition::Clouds) => Self::CloudyDay,
            Some(Condition::Clear) if is_night => Self::ClearNight,
            Some(Condition::Clear) => Self::ClearDay,
            _ => Self::Default,
        }
    }
}
