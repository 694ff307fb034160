use chrono_tz::Tz;
use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::forecast::{ForecastSource, MAX_VARIATION};
use crate::lookup::OPENWEATHERMAP_BASE_URL;
use crate::presentation::AdvisoryTexts;

/// Which backend resolves city names
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupBackendKind {
    /// In-memory table (bundled or loaded from `table_path`)
    #[default]
    Table,
    /// OpenWeatherMap current weather API
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lookup backend: table or remote
    #[serde(default)]
    pub backend: LookupBackendKind,

    /// OpenWeatherMap API key (required for the remote backend)
    #[serde(default)]
    pub openweathermap_api_key: Option<String>,

    /// OpenWeatherMap API base URL
    #[serde(default = "default_base_url")]
    pub openweathermap_base_url: String,

    /// JSON city table; the bundled table is used when unset
    #[serde(default)]
    pub table_path: Option<String>,

    /// Simulated latency for table lookups in milliseconds
    #[serde(default = "default_table_latency_ms")]
    pub table_latency_ms: u64,

    /// City requested when the dashboard starts
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Curated cities offered for selection
    #[serde(default = "default_popular_cities")]
    pub popular_cities: Vec<String>,

    /// How many of the curated cities are shown
    #[serde(default = "default_popular_cities_shown")]
    pub popular_cities_shown: usize,

    /// IANA timezone for the clock, day labels and night detection
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,

    /// Forecast configuration
    #[serde(default)]
    pub forecast: ForecastSettings,

    /// Advisory text overrides
    #[serde(default)]
    pub advisories: AdvisoryTexts,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastSettings {
    /// synthetic or provider
    #[serde(default)]
    pub source: ForecastSource,

    /// Lower perturbation bound in whole degrees
    #[serde(default = "default_variation_min")]
    pub variation_min: i32,

    /// Upper perturbation bound in whole degrees
    #[serde(default = "default_variation_max")]
    pub variation_max: i32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            source: ForecastSource::default(),
            variation_min: default_variation_min(),
            variation_max: default_variation_max(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    OPENWEATHERMAP_BASE_URL.to_string()
}

fn default_table_latency_ms() -> u64 {
    500
}

fn default_city() -> String {
    "Mumbai".to_string()
}

fn default_popular_cities() -> Vec<String> {
    [
        "Mumbai",
        "Delhi",
        "Bangalore",
        "Chennai",
        "Kolkata",
        "Hyderabad",
        "Pune",
        "Ahmedabad",
        "Jaipur",
        "Surat",
        "Lucknow",
        "Kanpur",
        "Nagpur",
        "Indore",
        "Bhopal",
        "Visakhapatnam",
        "Patna",
        "Vadodara",
        "Ghaziabad",
        "Agra",
    ]
    .iter()
    .map(|city| city.to_string())
    .collect()
}

fn default_popular_cities_shown() -> usize {
    10
}

fn default_display_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_variation_min() -> i32 {
    -MAX_VARIATION
}

fn default_variation_max() -> i32 {
    MAX_VARIATION
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            .set_default("display_timezone", default_display_timezone())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // CITYCAST_FORECAST__SOURCE=provider -> forecast.source
            .add_source(
                Environment::with_prefix("CITYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == LookupBackendKind::Remote && self.api_key().is_none() {
            return Err(ConfigError::Message(
                "openweathermap_api_key is required when backend = remote".to_string(),
            ));
        }

        self.timezone()?;
        Ok(())
    }

    /// Non-blank API key, if configured
    pub fn api_key(&self) -> Option<&str> {
        self.openweathermap_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display_timezone.parse::<Tz>().map_err(|e| {
            ConfigError::Message(format!(
                "Unknown display_timezone '{}': {}",
                self.display_timezone, e
            ))
        })
    }
}
