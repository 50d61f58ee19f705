use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::reference::ReferenceTables;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "SOLAR_ESTIMATOR_CONFIG";

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_weather_url() -> String { "https://api.open-meteo.com/v1/forecast".to_string() }
fn default_timeout_s() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Disables outbound weather lookups at startup; toggled at runtime via API
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Full replacement for the built-in reference tables
    #[serde(default)]
    pub reference_data: Option<ReferenceTables>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { base_url: default_weather_url(), timeout_s: default_timeout_s() }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        if let Some(tables) = &config.reference_data {
            tables.validate()?;
        }
        Ok(config)
    }

    /// Path from `SOLAR_ESTIMATOR_CONFIG`, else `config.json`. A missing file
    /// yields the defaults.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            tracing::warn!(%path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(&path)?;
        tracing::info!(%path, "configuration loaded");
        Ok(config)
    }

    /// Reference tables in effect: the configured override or the built-in data.
    pub fn reference_tables(&self) -> ReferenceTables {
        self.reference_data.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(!cfg.offline_mode);
        assert_eq!(cfg.weather.timeout_s, 10);
        assert_eq!(cfg.reference_tables(), ReferenceTables::default());
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let cfg = Config::from_json(r#"{ "server": { "port": 3000 }, "offline_mode": true }"#).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.offline_mode);
    }

    #[test]
    fn reference_override_is_validated() {
        let mut tables = ReferenceTables::default();
        tables.cost_shares.panels = 0.9;
        let json = serde_json::json!({ "reference_data": tables }).to_string();
        let err = Config::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReferenceData(_)));
    }

    #[test]
    fn valid_reference_override_replaces_builtin_tables() {
        let mut tables = ReferenceTables::default();
        tables.cost_per_watt.mixed = 3.5;
        let json = serde_json::json!({ "reference_data": tables }).to_string();
        let cfg = Config::from_json(&json).unwrap();
        assert_eq!(cfg.reference_tables().cost_per_watt.mixed, 3.5);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Config::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn bundled_config_file_parses() {
        let cfg = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.json")).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }
}
