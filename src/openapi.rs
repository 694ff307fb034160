use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::handlers::{CitiesResponse, ClockResponse, SearchAccepted, SearchRequest};
use crate::dashboard::DashboardView;
use crate::error::ErrorResponse;
use crate::forecast::ForecastResponse;
use crate::lookup::handlers::HealthResponse;
use crate::presentation::WeatherView;

/// OpenAPI documentation for the citycast API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "citycast API",
        version = "0.1.0",
        description = "City weather dashboard: search a city, get a snapshot with display attributes and a five-day outlook.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "dashboard", description = "Search, selection and the committed dashboard view"),
        (name = "weather", description = "Stateless current weather lookups"),
        (name = "forecast", description = "Five-day forecasts"),
        (name = "meta", description = "Health, curated cities and clock")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            SearchRequest,
            SearchAccepted,
            DashboardView,
            WeatherView,
            ForecastResponse,
            CitiesResponse,
            ClockResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;

        for name in ["DashboardView", "WeatherView", "ForecastResponse", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "missing schema {}", name);
        }
    }
}
