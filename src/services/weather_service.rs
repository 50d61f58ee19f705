use chrono::{DateTime, Utc};

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::models::reference::ReferenceSite;
use crate::models::weather::{
    CurrentConditions, CurrentData, CurrentWeatherResponse, InstallationAssessment, Recommendation,
};

/// Assumed when Open-Meteo omits the temperature.
const DEFAULT_TEMPERATURE_F: f64 = 70.0;

/// Installation suitability on a 0..100 scale from current conditions
/// (°F, mph, cloud cover %). Penalties stack.
pub fn installation_score(temperature_f: f64, wind_speed_mph: f64, cloud_cover_percent: f64) -> u8 {
    let mut score = 100.0;

    if temperature_f > 95.0 {
        score -= 20.0; // too hot to work on a roof
    }
    if temperature_f < 35.0 {
        score -= 30.0;
    }
    if wind_speed_mph > 15.0 {
        score -= 25.0;
    }
    if wind_speed_mph > 25.0 {
        score -= 40.0;
    }
    if cloud_cover_percent > 80.0 {
        score -= 15.0;
    }

    f64::clamp(score, 0.0, 100.0).round() as u8
}

pub fn recommendation(score: u8) -> Recommendation {
    match score {
        80.. => Recommendation::Excellent,
        60..=79 => Recommendation::Good,
        40..=59 => Recommendation::Caution,
        _ => Recommendation::Poor,
    }
}

/// Scores the raw readings; only the reported conditions are rounded.
pub fn assess(current: &CurrentData, city: &str) -> InstallationAssessment {
    let score = installation_score(
        current.temperature_2m.unwrap_or(DEFAULT_TEMPERATURE_F),
        current.wind_speed_10m.unwrap_or(0.0),
        current.cloud_cover.unwrap_or(0.0),
    );
    InstallationAssessment {
        score,
        recommendation: recommendation(score),
        city: city.to_string(),
    }
}

/// Short label for a WMO weather code as reported by Open-Meteo.
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

pub fn forecast_url(base_url: &str, site: &ReferenceSite) -> String {
    format!(
        "{}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,wind_speed_10m,cloud_cover,weather_code&temperature_unit=fahrenheit&wind_speed_unit=mph",
        base_url.trim_end_matches('/'),
        site.latitude,
        site.longitude
    )
}

pub fn conditions_from_response(current: &CurrentData) -> CurrentConditions {
    let weather_code = current.weather_code.unwrap_or(0);

    // Open-Meteo: "2025-12-28T10:40" -> add ":00Z"
    let ts_fixed = format!("{}:00Z", current.time);
    let observed_at = ts_fixed.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now());

    CurrentConditions {
        observed_at,
        temperature_f: current.temperature_2m.unwrap_or(DEFAULT_TEMPERATURE_F).round() as i64,
        humidity_percent: current.relative_humidity_2m.unwrap_or(0.0).round() as i64,
        wind_speed_mph: current.wind_speed_10m.unwrap_or(0.0).round() as i64,
        cloud_cover_percent: current.cloud_cover.unwrap_or(0.0).round() as i64,
        weather_code,
        conditions: describe_weather_code(weather_code).to_string(),
    }
}

/// Current conditions at `site` from Open-Meteo, with the installation
/// assessment for its city.
pub async fn get_installation_conditions(
    client: &reqwest::Client,
    cfg: &WeatherConfig,
    site: &ReferenceSite,
) -> Result<(CurrentConditions, InstallationAssessment), WeatherError> {
    let url = forecast_url(&cfg.base_url, site);
    tracing::debug!(%url, city = %site.city, "fetching current weather");

    let resp = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<CurrentWeatherResponse>()
        .await?;

    Ok((conditions_from_response(&resp.current), assess(&resp.current, &site.city)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mild_clear_day_is_perfect() {
        assert_eq!(installation_score(72.0, 5.0, 10.0), 100);
        assert_eq!(recommendation(100), Recommendation::Excellent);
    }

    #[test]
    fn wind_penalties_stack() {
        assert_eq!(installation_score(72.0, 20.0, 0.0), 75);
        assert_eq!(installation_score(72.0, 30.0, 0.0), 35);
        assert_eq!(recommendation(35), Recommendation::Poor);
    }

    #[test]
    fn score_never_drops_below_zero() {
        assert_eq!(installation_score(20.0, 40.0, 95.0), 0);
    }

    #[test]
    fn recommendation_bands() {
        assert_eq!(recommendation(80), Recommendation::Excellent);
        assert_eq!(recommendation(79), Recommendation::Good);
        assert_eq!(recommendation(60), Recommendation::Good);
        assert_eq!(recommendation(59), Recommendation::Caution);
        assert_eq!(recommendation(40), Recommendation::Caution);
        assert_eq!(recommendation(39), Recommendation::Poor);
    }

    #[test]
    fn hot_and_overcast_is_good() {
        // 100 - 20 (heat) - 15 (clouds)
        assert_eq!(installation_score(101.0, 3.0, 90.0), 65);
        assert_eq!(recommendation(65), Recommendation::Good);
    }

    #[test]
    fn parses_open_meteo_payload() {
        let json = r#"{
            "latitude": 34.05,
            "longitude": -118.25,
            "current": {
                "time": "2025-07-01T18:45",
                "interval": 900,
                "temperature_2m": 84.6,
                "relative_humidity_2m": 41,
                "wind_speed_10m": 9.4,
                "cloud_cover": 12,
                "weather_code": 1
            }
        }"#;
        let resp: CurrentWeatherResponse = serde_json::from_str(json).unwrap();
        let c = conditions_from_response(&resp.current);
        assert_eq!(c.temperature_f, 85);
        assert_eq!(c.wind_speed_mph, 9);
        assert_eq!(c.cloud_cover_percent, 12);
        assert_eq!(c.conditions, "Mainly clear");
        assert_eq!(c.observed_at.to_rfc3339(), "2025-07-01T18:45:00+00:00");
    }

    #[test]
    fn forecast_url_requests_imperial_units() {
        let site = ReferenceSite { city: "Houston".into(), latitude: 29.7604, longitude: -95.3698 };
        let url = forecast_url("https://api.open-meteo.com/v1/forecast/", &site);
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=29.7604&longitude=-95.3698"));
        assert!(url.contains("temperature_unit=fahrenheit"));
        assert!(url.contains("wind_speed_unit=mph"));
    }

    #[test]
    fn readings_just_over_thresholds_are_penalized() {
        let json = r#"{
            "current": {
                "time": "2025-08-12T14:00",
                "temperature_2m": 95.4,
                "relative_humidity_2m": 30,
                "wind_speed_10m": 15.3,
                "cloud_cover": 80.4,
                "weather_code": 3
            }
        }"#;
        let resp: CurrentWeatherResponse = serde_json::from_str(json).unwrap();

        // 100 - 20 (heat) - 25 (wind) - 15 (clouds)
        let a = assess(&resp.current, "Phoenix");
        assert_eq!(a.score, 40);
        assert_eq!(a.recommendation, Recommendation::Caution);

        // displayed values are rounded, the score is not derived from them
        let c = conditions_from_response(&resp.current);
        assert_eq!((c.temperature_f, c.wind_speed_mph, c.cloud_cover_percent), (95, 15, 80));
    }
}
