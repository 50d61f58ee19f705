use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Typed failures of the estimate engine. Never used for control flow
/// inside the pipeline: every operation either returns a complete value
/// or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// A required number is missing or non-positive, or a categorical
    /// value has no safe default.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A region profile is internally inconsistent (e.g. non-positive sun hours).
    #[error("invalid region data for '{region}': {reason}")]
    InvalidRegionData { region: String, reason: String },
}

impl EstimateError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidRegionData { .. } => "INVALID_REGION_DATA",
        }
    }
}

/// Startup failures while loading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid reference data: {0}")]
    InvalidReferenceData(String),
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Error returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("offline mode is enabled; outbound weather lookups are disabled")]
    Offline,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Estimate(e) => match e {
                EstimateError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.kind()),
                EstimateError::InvalidRegionData { .. } => (StatusCode::INTERNAL_SERVER_ERROR, e.kind()),
            },
            Self::Weather(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            Self::Offline => (StatusCode::SERVICE_UNAVAILABLE, "OFFLINE_MODE"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let body = serde_json::json!({
            "error": kind,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let resp = ApiError::from(EstimateError::invalid_input("monthly_bill_usd must be > 0")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn region_data_maps_to_server_error() {
        let err = EstimateError::InvalidRegionData {
            region: "texas".into(),
            reason: "sun_hours_per_day must be > 0".into(),
        };
        assert_eq!(err.kind(), "INVALID_REGION_DATA");
        assert_eq!(ApiError::from(err).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn offline_maps_to_service_unavailable() {
        assert_eq!(ApiError::Offline.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
