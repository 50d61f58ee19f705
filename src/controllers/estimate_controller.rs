use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::{ApiError, EstimateError};
use crate::models::estimate::{EstimateInput, EstimateRequest, EstimateResponse, SourcingComparison};
use crate::models::reference::{RegionCatalog, RegionLookup};
use crate::services::estimate_service::{build_estimate, compare_panel_origins};
use crate::shared_state::AppState;

fn parse_request(req: EstimateRequest) -> Result<EstimateInput, ApiError> {
    EstimateInput::try_from(req).map_err(|e| {
        tracing::warn!(error = %e, "rejected estimate request");
        ApiError::from(e)
    })
}

fn log_rejection(e: EstimateError) -> ApiError {
    match &e {
        EstimateError::InvalidInput(_) => tracing::warn!(error = %e, "estimate input rejected"),
        EstimateError::InvalidRegionData { .. } => tracing::error!(error = %e, "reference data is inconsistent"),
    }
    ApiError::from(e)
}

/// POST /api/estimate
/// Build a solar estimate
///
/// Sizes the system for the given usage and roof, prices it by panel origin,
/// projects savings and splits the cost into domestic and foreign content.
#[utoipa::path(
    post,
    path = "/api/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Complete estimate", body = EstimateResponse),
        (status = 400, description = "Missing, non-positive or unknown input value"),
        (status = 500, description = "Inconsistent reference data")
    )
)]
pub async fn create_estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let input = parse_request(req)?;
    let estimate = build_estimate(&state.tables, &input).map_err(log_rejection)?;
    Ok(Json(EstimateResponse {
        timestamp: chrono::Utc::now(),
        estimate,
    }))
}

/// POST /api/estimate/compare
/// Compare panel origins
///
/// Runs the same estimate for domestic, foreign and mixed panels and
/// recommends the cheapest Buy America compliant option.
#[utoipa::path(
    post,
    path = "/api/estimate/compare",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "One scenario per panel origin", body = SourcingComparison),
        (status = 400, description = "Missing, non-positive or unknown input value")
    )
)]
pub async fn compare_estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<SourcingComparison>, ApiError> {
    let input = parse_request(req)?;
    let comparison = compare_panel_origins(&state.tables, &input).map_err(log_rejection)?;
    Ok(Json(comparison))
}

/// GET /api/regions
/// List region profiles
#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "All regions and the default profile", body = RegionCatalog)
    )
)]
pub async fn list_regions(State(state): State<AppState>) -> impl IntoResponse {
    Json(RegionCatalog {
        regions: state.tables.regions.clone(),
        default_region: state.tables.default_region.clone(),
    })
}

/// GET /api/regions/{key}
/// Look up one region
///
/// Unknown keys return the default profile with `is_default = true`.
#[utoipa::path(
    get,
    path = "/api/regions/{key}",
    params(
        ("key" = String, Path, description = "Region key, e.g. `new-york`")
    ),
    responses(
        (status = 200, description = "Resolved region profile", body = RegionLookup)
    )
)]
pub async fn get_region(Path(key): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    let resolved = state.tables.lookup_region(&key);
    Json(RegionLookup {
        key: resolved.key.to_string(),
        is_default: resolved.is_default,
        profile: resolved.profile.clone(),
    })
}
