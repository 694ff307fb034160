use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::models::{CityKey, CurrentWeatherPayload, WeatherSnapshot};
use super::service::{LookupBackend, LookupError};

/// Table shipped with the binary, used when no table file is configured
const BUNDLED_TABLE: &str = include_str!("../../data/cities.json");

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read city table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse city table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid city table record: {0}")]
    InvalidRecord(String),

    #[error("City table has no records")]
    Empty,
}

/// Static, read-only city table keyed by normalized city name
pub struct TableLookup {
    table: IndexMap<CityKey, WeatherSnapshot>,
    latency: Duration,
}

impl TableLookup {
    /// Build a table from snapshots, keyed by each snapshot's name.
    /// Later records replace earlier ones with the same key.
    pub fn new(snapshots: impl IntoIterator<Item = WeatherSnapshot>, latency: Duration) -> Self {
        let table = snapshots
            .into_iter()
            .map(|snapshot| (CityKey::new(&snapshot.name), snapshot))
            .collect();

        Self { table, latency }
    }

    /// Parse a JSON array of provider-shaped current weather records
    pub fn from_json(json: &str, latency: Duration) -> Result<Self, TableError> {
        let records: Vec<CurrentWeatherPayload> = serde_json::from_str(json)?;

        let snapshots = records
            .into_iter()
            .map(|record| {
                let name = record.name.clone();
                record
                    .into_snapshot()
                    .map_err(|e| TableError::InvalidRecord(format!("{}: {}", name, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = Self::new(snapshots, latency);
        if table.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(table)
    }

    pub fn bundled(latency: Duration) -> Result<Self, TableError> {
        Self::from_json(BUNDLED_TABLE, latency)
    }

    /// Load from a file, or fall back to the bundled table
    pub fn load(path: Option<&str>, latency: Duration) -> Result<Self, TableError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(Path::new(path))?;
                let table = Self::from_json(&json, latency)?;
                tracing::info!(path = %path, cities = table.len(), "City table loaded");
                Ok(table)
            }
            None => {
                let table = Self::bundled(latency)?;
                tracing::info!(cities = table.len(), "Bundled city table loaded");
                Ok(table)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[async_trait]
impl LookupBackend for TableLookup {
    fn name(&self) -> &'static str {
        "table"
    }

    async fn resolve(&self, key: &CityKey) -> Result<WeatherSnapshot, LookupError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.table
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(key.to_string()))
    }

    fn cities(&self) -> Vec<String> {
        self.table.values().map(|s| s.name.clone()).collect()
    }
}
