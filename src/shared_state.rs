use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, WeatherConfig};
use crate::models::reference::ReferenceTables;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Reference tables, read-only after startup
    pub tables: Arc<ReferenceTables>,
    pub weather: WeatherConfig,
    pub http: reqwest::Client,
    /// Offline mode flag, toggled at runtime via API
    pub offline_mode: Arc<AtomicBool>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(tables: ReferenceTables, weather: WeatherConfig, offline_mode_default: bool) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(weather.timeout_s))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build configured HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            tables: Arc::new(tables),
            weather,
            http,
            offline_mode: Arc::new(AtomicBool::new(offline_mode_default)),
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reference_tables(), config.weather.clone(), config.offline_mode)
    }

    pub fn is_offline(&self) -> bool {
        self.offline_mode.load(Ordering::Relaxed)
    }

    pub fn set_offline(&self, value: bool) {
        self.offline_mode.store(value, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
