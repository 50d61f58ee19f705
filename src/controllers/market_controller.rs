use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::reference::PricingResponse;
use crate::models::weather::InstallationConditionsResponse;
use crate::services::reference_tables::FALLBACK_MARKET_REGION;
use crate::services::{pricing_service, weather_service};
use crate::shared_state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegionQuery {
    /// Region key; defaults to `california`
    pub region: Option<String>,
}

impl RegionQuery {
    fn key(&self) -> &str {
        self.region.as_deref().unwrap_or(FALLBACK_MARKET_REGION)
    }
}

/// GET /api/pricing
/// Regional installed pricing
///
/// Residential and commercial price per watt for the region, with current
/// market trends and available incentives.
#[utoipa::path(
    get,
    path = "/api/pricing",
    params(RegionQuery),
    responses(
        (status = 200, description = "Regional pricing", body = PricingResponse),
        (status = 404, description = "No market data configured")
    )
)]
pub async fn get_pricing(Query(q): Query<RegionQuery>, State(state): State<AppState>) -> Response {
    match pricing_service::regional_pricing(&state.tables, q.key()) {
        Some(pricing) => (StatusCode::OK, Json(pricing)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No pricing data available"})),
        )
            .into_response(),
    }
}

/// GET /api/installation-conditions
/// Current installation conditions
///
/// Fetches live weather for the region's reference city and scores how
/// suitable it is for a rooftop installation today.
#[utoipa::path(
    get,
    path = "/api/installation-conditions",
    params(RegionQuery),
    responses(
        (status = 200, description = "Current conditions and installation score", body = InstallationConditionsResponse),
        (status = 404, description = "No reference site configured"),
        (status = 502, description = "Weather provider unavailable"),
        (status = 503, description = "Offline mode enabled")
    )
)]
pub async fn get_installation_conditions(
    Query(q): Query<RegionQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    if state.is_offline() {
        return Err(ApiError::Offline);
    }
    let Some((region, site)) = state.tables.reference_site(q.key()) else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No reference site available"})),
        )
            .into_response());
    };

    let (current, installation) = weather_service::get_installation_conditions(&state.http, &state.weather, site)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, city = %site.city, "weather lookup failed");
            ApiError::from(e)
        })?;
    tracing::info!(%region, score = installation.score, "installation conditions assessed");

    Ok(Json(InstallationConditionsResponse {
        region: region.to_string(),
        current,
        installation,
    })
    .into_response())
}
