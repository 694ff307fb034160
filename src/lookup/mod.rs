pub mod handlers;
pub mod models;
mod remote;
mod service;
mod table;

pub use models::{normalize_city, CityKey, Condition, WeatherSnapshot};
pub use remote::{RemoteLookup, OPENWEATHERMAP_BASE_URL};
pub use service::{ErrorKind, LookupBackend, LookupError, WeatherLookupService};
pub use table::{TableError, TableLookup};
