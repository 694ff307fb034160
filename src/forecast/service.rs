use std::sync::Arc;

use super::models::{Forecast, ForecastSource};
use super::synthesizer::ForecastSynthesizer;
use crate::lookup::{CityKey, LookupError, WeatherLookupService, WeatherSnapshot};

/// Derives the forecast that accompanies a resolved snapshot
pub struct ForecastService {
    lookup: Arc<WeatherLookupService>,
    synthesizer: ForecastSynthesizer,
    source: ForecastSource,
}

impl ForecastService {
    pub fn new(
        lookup: Arc<WeatherLookupService>,
        synthesizer: ForecastSynthesizer,
        source: ForecastSource,
    ) -> Self {
        let (variation_min, variation_max) = synthesizer.variation();
        tracing::debug!(
            source = ?source,
            backend = lookup.backend_name(),
            variation_min,
            variation_max,
            "Forecast service ready"
        );

        Self {
            lookup,
            synthesizer,
            source,
        }
    }

    pub fn source(&self) -> ForecastSource {
        self.source
    }

    /// Forecast for a resolved snapshot, relative to `reference_time` (seconds).
    ///
    /// Provider mode asks the backend first and falls back to synthesis when the
    /// backend has no forecast of its own. Provider failures are returned as-is.
    pub async fn forecast_for(
        &self,
        key: &CityKey,
        snapshot: &WeatherSnapshot,
        reference_time: i64,
    ) -> Result<Forecast, LookupError> {
        if self.source == ForecastSource::Provider {
            if let Some(result) = self.lookup.provider_forecast(key).await {
                return result;
            }
            tracing::debug!(
                city = %key,
                backend = self.lookup.backend_name(),
                "Backend has no provider forecast, synthesizing"
            );
        }

        Ok(self.synthesizer.synthesize(snapshot.temperature, reference_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{ForecastEntry, FORECAST_DAYS};
    use crate::lookup::models::sample_snapshot;
    use crate::lookup::{Condition, LookupBackend, TableLookup};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedForecastBackend;

    #[async_trait]
    impl LookupBackend for FixedForecastBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn resolve(&self, key: &CityKey) -> Result<WeatherSnapshot, LookupError> {
            Ok(sample_snapshot(key.as_str(), 10.0, Condition::Snow))
        }

        async fn forecast(&self, _key: &CityKey) -> Option<Result<Forecast, LookupError>> {
            let entries: Vec<ForecastEntry> = (1..=FORECAST_DAYS as i64)
                .map(|day| ForecastEntry {
                    timestamp: day * 86_400,
                    temperature: -1.0,
                    condition: Condition::Snow,
                    description: "light snow".to_string(),
                })
                .collect();
            Some(Forecast::try_from(entries).map_err(|_| LookupError::Transport("short".into())))
        }
    }

    fn table_lookup() -> Arc<WeatherLookupService> {
        Arc::new(WeatherLookupService::new(Arc::new(TableLookup::new(
            vec![sample_snapshot("Pune", 27.0, Condition::Clear)],
            Duration::ZERO,
        ))))
    }

    #[tokio::test]
    async fn test_synthetic_source() {
        let service = ForecastService::new(
            table_lookup(),
            ForecastSynthesizer::default(),
            ForecastSource::Synthetic,
        );
        let snapshot = sample_snapshot("Pune", 27.0, Condition::Clear);

        let forecast = service
            .forecast_for(&CityKey::new("pune"), &snapshot, 1_000)
            .await
            .unwrap();
        assert_eq!(forecast.entries()[0].timestamp, 1_000 + 86_400);
        assert!(forecast
            .entries()
            .iter()
            .all(|e| (23.0..=31.0).contains(&e.temperature)));
    }

    #[tokio::test]
    async fn test_provider_source_uses_backend_forecast() {
        let lookup = Arc::new(WeatherLookupService::new(Arc::new(FixedForecastBackend)));
        let service = ForecastService::new(
            lookup,
            ForecastSynthesizer::default(),
            ForecastSource::Provider,
        );
        let snapshot = sample_snapshot("Shimla", 10.0, Condition::Snow);

        let forecast = service
            .forecast_for(&CityKey::new("shimla"), &snapshot, 0)
            .await
            .unwrap();
        assert!(forecast.entries().iter().all(|e| e.temperature == -1.0));
    }

    #[tokio::test]
    async fn test_provider_source_falls_back_for_table() {
        let service = ForecastService::new(
            table_lookup(),
            ForecastSynthesizer::new(0, 0),
            ForecastSource::Provider,
        );
        let snapshot = sample_snapshot("Pune", 27.0, Condition::Clear);

        let forecast = service
            .forecast_for(&CityKey::new("pune"), &snapshot, 0)
            .await
            .unwrap();
        assert!(forecast.entries().iter().all(|e| e.temperature == 27.0));
    }
}
