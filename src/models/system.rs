use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub regions_loaded: usize,
    pub offline_mode: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OfflineModeSetting {
    pub enabled: bool,
}
