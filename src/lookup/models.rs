use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// City keys
// ============================================================================

/// Normalize a city name for lookups.
/// Trims surrounding whitespace and lower-cases the rest.
pub fn normalize_city(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A normalized city name. Two keys are equal iff their normalized forms are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CityKey(String);

impl CityKey {
    pub fn new(name: &str) -> Self {
        Self(normalize_city(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Conditions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Thunderstorm,
    Other,
}

impl Condition {
    /// Map provider condition text into the closed set (case-insensitive).
    pub fn from_provider(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            _ => Self::Other,
        }
    }

    /// Fixed description used for synthesized forecast days
    pub fn default_description(self) -> &'static str {
        match self {
            Self::Clear => "clear sky",
            Self::Clouds => "scattered clouds",
            Self::Rain => "light rain",
            Self::Drizzle => "light drizzle",
            Self::Snow => "light snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Other => "mixed conditions",
        }
    }

    pub fn is_wet(self) -> bool {
        matches!(self, Self::Rain | Self::Drizzle)
    }
}

// ============================================================================
// Snapshot (what we hand to the rest of the app)
// ============================================================================

/// A single point-in-time weather reading for one location
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherSnapshot {
    pub name: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Degrees Celsius
    pub feels_like: f64,
    /// Percent, 0-100
    pub humidity: u8,
    /// hPa
    pub pressure: u32,
    /// m/s
    pub wind_speed: f64,
    pub condition: Condition,
    pub description: String,
}

// ============================================================================
// OpenWeatherMap current weather payload (Internal)
// The static table uses the same record shape
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherPayload {
    pub name: String,
    pub sys: SysInfo,
    pub main: MainInfo,
    pub weather: Vec<WeatherInfo>,
    pub wind: WindInfo,
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Deserialize)]
pub struct WeatherInfo {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
}

/// Reasons a provider-shaped record cannot become a snapshot
#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("no weather condition")]
    NoCondition,

    #[error("humidity {0}% is outside 0-100")]
    HumidityOutOfRange(u32),

    #[error("pressure must be positive")]
    NonPositivePressure,

    #[error("wind speed {0} m/s is negative")]
    NegativeWindSpeed(f64),
}

impl CurrentWeatherPayload {
    /// Map the payload into a snapshot, rejecting out-of-range readings
    pub fn into_snapshot(self) -> Result<WeatherSnapshot, PayloadError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or(PayloadError::NoCondition)?;

        let humidity = u8::try_from(self.main.humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or(PayloadError::HumidityOutOfRange(self.main.humidity))?;

        if self.main.pressure == 0 {
            return Err(PayloadError::NonPositivePressure);
        }
        if self.wind.speed < 0.0 {
            return Err(PayloadError::NegativeWindSpeed(self.wind.speed));
        }

        Ok(WeatherSnapshot {
            name: self.name,
            country: self.sys.country,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            condition: Condition::from_provider(&weather.main),
            description: weather.description,
        })
    }
}

// ============================================================================
// OpenWeatherMap 5 day / 3 hour forecast payload (Internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<WeatherInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

/// Error body returned by OpenWeatherMap on failures
#[derive(Debug, Deserialize)]
pub struct ProviderError {
    pub message: String,
}

#[cfg(test)]
pub(crate) fn sample_snapshot(name: &str, temperature: f64, condition: Condition) -> WeatherSnapshot {
    WeatherSnapshot {
        name: name.to_string(),
        country: "IN".to_string(),
        temperature,
        feels_like: temperature + 2.0,
        humidity: 65,
        pressure: 1012,
        wind_speed: 3.5,
        condition,
        description: condition.default_description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("  Mumbai "), "mumbai");
        assert_eq!(normalize_city("NEW DELHI"), "new delhi");
        assert_eq!(normalize_city(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["Mumbai", "  mumbai ", "\tBENGALURU\n", "São Paulo", "   "] {
            let once = normalize_city(input);
            assert_eq!(normalize_city(&once), once);
        }
    }

    #[test]
    fn test_city_key_equality() {
        assert_eq!(CityKey::new("Mumbai"), CityKey::new("  mumbai "));
        assert_ne!(CityKey::new("Mumbai"), CityKey::new("Delhi"));
        assert!(CityKey::new("   ").is_empty());
    }

    #[test]
    fn test_condition_from_provider() {
        assert_eq!(Condition::from_provider("Clear"), Condition::Clear);
        assert_eq!(Condition::from_provider("CLOUDS"), Condition::Clouds);
        assert_eq!(Condition::from_provider("drizzle"), Condition::Drizzle);
        assert_eq!(Condition::from_provider(" Thunderstorm "), Condition::Thunderstorm);
        assert_eq!(Condition::from_provider("Haze"), Condition::Other);
        assert_eq!(Condition::from_provider(""), Condition::Other);
    }

    #[test]
    fn test_payload_into_snapshot() {
        let payload: CurrentWeatherPayload = serde_json::from_value(serde_json::json!({
            "name": "Mumbai",
            "sys": { "country": "IN" },
            "main": { "temp": 32.0, "feels_like": 36.4, "humidity": 78, "pressure": 1008 },
            "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
            "wind": { "speed": 4.1 }
        }))
        .unwrap();

        let snapshot = payload.into_snapshot().unwrap();
        assert_eq!(snapshot.name, "Mumbai");
        assert_eq!(snapshot.country, "IN");
        assert_eq!(snapshot.temperature, 32.0);
        assert_eq!(snapshot.humidity, 78);
        assert_eq!(snapshot.pressure, 1008);
        assert_eq!(snapshot.condition, Condition::Clouds);
        assert_eq!(snapshot.description, "scattered clouds");
    }

    #[test]
    fn test_payload_without_conditions() {
        let payload: CurrentWeatherPayload = serde_json::from_value(serde_json::json!({
            "name": "Nowhere",
            "sys": { "country": "XX" },
            "main": { "temp": 10.0, "feels_like": 9.0, "humidity": 50, "pressure": 1000 },
            "weather": [],
            "wind": { "speed": 1.0 }
        }))
        .unwrap();

        assert_eq!(payload.into_snapshot(), Err(PayloadError::NoCondition));
    }

    fn payload_with(humidity: u32, pressure: u32, wind: f64) -> CurrentWeatherPayload {
        serde_json::from_value(serde_json::json!({
            "name": "Pune",
            "sys": { "country": "IN" },
            "main": { "temp": 27.0, "feels_like": 28.0, "humidity": humidity, "pressure": pressure },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "wind": { "speed": wind }
        }))
        .unwrap()
    }

    #[test]
    fn test_payload_out_of_range_readings() {
        assert_eq!(
            payload_with(101, 1010, 2.0).into_snapshot(),
            Err(PayloadError::HumidityOutOfRange(101))
        );
        assert_eq!(
            payload_with(300, 1010, 2.0).into_snapshot(),
            Err(PayloadError::HumidityOutOfRange(300))
        );
        assert_eq!(
            payload_with(50, 0, 2.0).into_snapshot(),
            Err(PayloadError::NonPositivePressure)
        );
        assert_eq!(
            payload_with(50, 1010, -1.5).into_snapshot(),
            Err(PayloadError::NegativeWindSpeed(-1.5))
        );
    }

    #[test]
    fn test_payload_boundary_readings() {
        let snapshot = payload_with(100, 1, 0.0).into_snapshot().unwrap();
        assert_eq!(snapshot.humidity, 100);
        assert_eq!(snapshot.pressure, 1);
        assert_eq!(snapshot.wind_speed, 0.0);
    }
}
