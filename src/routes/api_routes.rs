use axum::{routing::{get, post}, Router};

use crate::controllers::estimate_controller::{compare_estimate, create_estimate, get_region, list_regions};
use crate::controllers::market_controller::{get_installation_conditions, get_pricing};
use crate::controllers::system_controller::{get_health, get_offline_mode, set_offline_mode};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/estimate",                 post(create_estimate))
        .route("/estimate/compare",         post(compare_estimate))
        .route("/regions",                  get(list_regions))
        .route("/regions/{key}",            get(get_region))
        .route("/pricing",                  get(get_pricing))
        .route("/installation-conditions",  get(get_installation_conditions))
        .route("/settings/offline-mode",    get(get_offline_mode).post(set_offline_mode))
        .route("/health",                   get(get_health))
        .with_state(state)
}
