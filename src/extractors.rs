use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: Option<String>,
}

/// City name from the `{city}` path segment or the `?city=` query.
///
/// The path wins; blank values count as absent so the handler falls back to
/// its default city.
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

impl CityParam {
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = CityParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            if !city.trim().is_empty() {
                return Ok(CityParam(Some(city)));
            }
        }

        match Query::<CityQuery>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(CityParam(
                query.city.filter(|city| !city.trim().is_empty()),
            )),
            Err(rejection) => Err(CityParamRejection(rejection.body_text())),
        }
    }
}

#[derive(Debug)]
pub struct CityParamRejection(pub String);

impl IntoResponse for CityParamRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(self.0))).into_response()
    }
}
