use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Open-Meteo wire types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: CurrentData,
}

/// Requested with `temperature_unit=fahrenheit&wind_speed_unit=mph`.
#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub weather_code: Option<u16>,
}

// ─── REST API response types ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentConditions {
    pub observed_at: DateTime<Utc>,
    /// °F
    pub temperature_f: i64,
    /// Percent
    pub humidity_percent: i64,
    /// mph
    pub wind_speed_mph: i64,
    /// Percent of sky covered
    pub cloud_cover_percent: i64,
    pub weather_code: u16,
    pub conditions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Recommendation {
    Excellent,
    Good,
    Caution,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InstallationAssessment {
    /// 0..100
    pub score: u8,
    pub recommendation: Recommendation,
    pub city: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstallationConditionsResponse {
    pub region: String,
    pub current: CurrentConditions,
    pub installation: InstallationAssessment,
}
