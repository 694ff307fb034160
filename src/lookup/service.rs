use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::models::{CityKey, WeatherSnapshot};
use crate::error::HttpError;
use crate::forecast::Forecast;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("City not found: {0}")]
    NotFound(String),

    #[error("Weather provider request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Serializable failure tag carried by a failed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    TransportError,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::TransportError,
        }
    }
}

impl HttpError for LookupError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::NotFound(_) => Some("CITY_NOT_FOUND"),
            Self::Transport(_) => Some("TRANSPORT_ERROR"),
        }
    }
}

impl_into_response!(LookupError);

/// A source of weather snapshots keyed by normalized city name
#[async_trait]
pub trait LookupBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    async fn resolve(&self, key: &CityKey) -> Result<WeatherSnapshot, LookupError>;

    /// Provider-supplied forecast, for backends that have one
    async fn forecast(&self, _key: &CityKey) -> Option<Result<Forecast, LookupError>> {
        None
    }

    /// City names this backend is known to resolve (empty when open-ended)
    fn cities(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolves city names against the configured backend.
/// Performs no caching and no retries.
pub struct WeatherLookupService {
    backend: Arc<dyn LookupBackend>,
}

impl WeatherLookupService {
    pub fn new(backend: Arc<dyn LookupBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Resolve a raw city name (trimmed and normalized here)
    pub async fn resolve(&self, city_name: &str) -> Result<WeatherSnapshot, LookupError> {
        self.resolve_key(&CityKey::new(city_name)).await
    }

    pub async fn resolve_key(&self, key: &CityKey) -> Result<WeatherSnapshot, LookupError> {
        if key.is_empty() {
            return Err(LookupError::NotFound(String::new()));
        }

        tracing::debug!(city = %key, backend = self.backend.name(), "Resolving city");

        let result = self.backend.resolve(key).await;
        if let Err(ref e) = result {
            tracing::debug!(city = %key, error = %e, "Lookup failed");
        }
        result
    }

    pub async fn provider_forecast(&self, key: &CityKey) -> Option<Result<Forecast, LookupError>> {
        self.backend.forecast(key).await
    }

    pub fn registered_cities(&self) -> Vec<String> {
        self.backend.cities()
    }
}
