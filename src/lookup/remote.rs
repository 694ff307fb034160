use async_trait::async_trait;
use reqwest::{Client, Response};

use super::models::{CityKey, Condition, CurrentWeatherPayload, ForecastPayload, ProviderError, WeatherSnapshot};
use super::service::{LookupBackend, LookupError};
use crate::forecast::{Forecast, ForecastEntry, FORECAST_DAYS};

pub const OPENWEATHERMAP_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Snapshots are always Celsius
const METRIC_UNITS: &str = "metric";

/// The forecast endpoint reports in 3 hour steps
const SAMPLES_PER_DAY: usize = 8;

/// OpenWeatherMap-backed lookups. One outbound request per call.
pub struct RemoteLookup {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RemoteLookup {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue a city query against an endpoint and classify failures
    async fn get(&self, endpoint: &str, key: &CityKey) -> Result<Response, LookupError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        // Query builder handles URL encoding of spaces and special chars
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", key.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", METRIC_UNITS),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, endpoint = %endpoint, city = %key, "Received provider response");

        if !status.is_success() {
            // Only the provider's own error body identifies a missing city
            let provider_message = response.json::<ProviderError>().await.ok().map(|e| e.message);

            if provider_message
                .as_deref()
                .is_some_and(|m| m.to_ascii_lowercase().contains("city not found"))
            {
                return Err(LookupError::NotFound(key.to_string()));
            }

            let message = provider_message.unwrap_or_else(|| format!("HTTP {}", status));
            return Err(LookupError::Transport(format!("HTTP {}: {}", status, message)));
        }

        Ok(response)
    }

    /// Pick one sample per day from the 3-hourly list
    fn daily_samples(payload: ForecastPayload) -> Result<Forecast, LookupError> {
        let entries: Vec<ForecastEntry> = payload
            .list
            .into_iter()
            .skip(SAMPLES_PER_DAY - 1)
            .step_by(SAMPLES_PER_DAY)
            .take(FORECAST_DAYS)
            .map(|item| {
                let weather = item.weather.into_iter().next();
                let condition = weather
                    .as_ref()
                    .map(|w| Condition::from_provider(&w.main))
                    .unwrap_or(Condition::Other);
                ForecastEntry {
                    timestamp: item.dt,
                    temperature: item.main.temp,
                    condition,
                    description: weather
                        .map(|w| w.description)
                        .unwrap_or_else(|| condition.default_description().to_string()),
                }
            })
            .collect();

        Forecast::try_from(entries).map_err(|entries| {
            LookupError::Transport(format!(
                "Forecast payload has {} daily samples, expected {}",
                entries.len(),
                FORECAST_DAYS
            ))
        })
    }
}

#[async_trait]
impl LookupBackend for RemoteLookup {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    async fn resolve(&self, key: &CityKey) -> Result<WeatherSnapshot, LookupError> {
        let response = self.get("weather", key).await?;
        let payload: CurrentWeatherPayload = response.json().await?;

        let snapshot = payload.into_snapshot().map_err(|e| {
            LookupError::Transport(format!("Invalid weather payload: {}", e))
        })?;

        tracing::info!(city = %snapshot.name, temp = %snapshot.temperature, "Weather data fetched successfully");

        Ok(snapshot)
    }

    async fn forecast(&self, key: &CityKey) -> Option<Result<Forecast, LookupError>> {
        let result = async {
            let response = self.get("forecast", key).await?;
            let payload: ForecastPayload = response.json().await?;
            Self::daily_samples(payload)
        }
        .await;

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn sample_weather_response() -> serde_json::Value {
        serde_json::json!({
            "coord": { "lon": 72.85, "lat": 19.01 },
            "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
            "main": { "temp": 32.0, "feels_like": 36.4, "temp_min": 31.0, "temp_max": 33.0, "pressure": 1008, "humidity": 78 },
            "visibility": 6000,
            "wind": { "speed": 4.1, "deg": 250 },
            "sys": { "country": "IN" },
            "name": "Mumbai",
            "cod": 200
        })
    }

    fn sample_forecast_response(count: usize) -> serde_json::Value {
        let start = 1_700_000_000_i64;
        let list: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "dt": start + (i as i64) * 3 * 3600,
                    "main": { "temp": 25.0 + i as f64 },
                    "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }]
                })
            })
            .collect();
        serde_json::json!({ "cod": "200", "cnt": count, "list": list })
    }

    fn create_test_lookup(mock_server: &MockServer) -> RemoteLookup {
        RemoteLookup::new(Client::new(), "test_api_key", &mock_server.uri())
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "mumbai"))
            .and(query_param("appid", "test_api_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let snapshot = lookup.resolve(&CityKey::new("Mumbai")).await.unwrap();

        assert_eq!(snapshot.name, "Mumbai");
        assert_eq!(snapshot.country, "IN");
        assert_eq!(snapshot.temperature, 32.0);
        assert_eq!(snapshot.humidity, 78);
        assert_eq!(snapshot.condition, Condition::Clouds);
    }

    #[tokio::test]
    async fn test_unknown_condition_maps_to_other() {
        let mock_server = MockServer::start().await;
        let mut body = sample_weather_response();
        body["weather"][0]["main"] = serde_json::json!("Haze");
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let snapshot = lookup.resolve(&CityKey::new("Delhi")).await.unwrap();
        assert_eq!(snapshot.condition, Condition::Other);
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.resolve(&CityKey::new("Atlantis")).await;
        assert!(matches!(result, Err(LookupError::NotFound(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_plain_404_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.resolve(&CityKey::new("Mumbai")).await;
        assert!(matches!(result, Err(LookupError::Transport(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_city_not_found_message_on_other_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "cod": "400", "message": "City not found" })),
            )
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        match lookup.resolve(&CityKey::new("Atlantis")).await {
            Err(LookupError::NotFound(city)) => assert_eq!(city, "atlantis"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_payload_is_transport() {
        let mock_server = MockServer::start().await;
        let mut body = sample_weather_response();
        body["main"]["humidity"] = serde_json::json!(140);
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.resolve(&CityKey::new("Mumbai")).await;
        assert!(matches!(result, Err(LookupError::Transport(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.resolve(&CityKey::new("Mumbai")).await;
        assert!(matches!(result, Err(LookupError::Transport(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_unauthorized_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
            )
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        match lookup.resolve(&CityKey::new("Mumbai")).await {
            Err(LookupError::Transport(message)) => assert!(message.contains("Invalid API key")),
            other => panic!("Expected Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.resolve(&CityKey::new("Mumbai")).await;
        assert!(matches!(result, Err(LookupError::Transport(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_forecast_takes_one_sample_per_day() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response(40)))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let forecast = lookup
            .forecast(&CityKey::new("Mumbai"))
            .await
            .unwrap()
            .unwrap();

        let entries = forecast.entries();
        assert_eq!(entries.len(), FORECAST_DAYS);
        assert_eq!(entries[0].temperature, 32.0);
        for pair in entries.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 86_400);
        }
        assert!(entries.iter().all(|e| e.condition == Condition::Rain));
    }

    #[tokio::test]
    async fn test_short_forecast_is_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response(16)))
            .mount(&mock_server)
            .await;

        let lookup = create_test_lookup(&mock_server);
        let result = lookup.forecast(&CityKey::new("Mumbai")).await.unwrap();
        assert!(matches!(result, Err(LookupError::Transport(_))));
    }
}
