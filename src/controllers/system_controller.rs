use axum::{extract::State, response::IntoResponse, Json};

use crate::models::system::{HealthStatus, OfflineModeSetting};
use crate::shared_state::AppState;

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        regions_loaded: state.tables.regions.len(),
        offline_mode: state.is_offline(),
    })
}

/// GET /api/settings/offline-mode
#[utoipa::path(
    get,
    path = "/api/settings/offline-mode",
    responses(
        (status = 200, description = "Current offline mode", body = OfflineModeSetting)
    )
)]
pub async fn get_offline_mode(State(state): State<AppState>) -> impl IntoResponse {
    Json(OfflineModeSetting { enabled: state.is_offline() })
}

/// POST /api/settings/offline-mode
/// Toggle offline mode
///
/// When enabled, endpoints that call the weather provider answer 503.
#[utoipa::path(
    post,
    path = "/api/settings/offline-mode",
    request_body = OfflineModeSetting,
    responses(
        (status = 200, description = "Updated offline mode", body = OfflineModeSetting)
    )
)]
pub async fn set_offline_mode(
    State(state): State<AppState>,
    Json(setting): Json<OfflineModeSetting>,
) -> impl IntoResponse {
    state.set_offline(setting.enabled);
    tracing::info!(enabled = setting.enabled, "offline mode changed");
    Json(OfflineModeSetting { enabled: state.is_offline() })
}
