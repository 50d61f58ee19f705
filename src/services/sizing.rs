use crate::error::EstimateError;
use crate::models::reference::RegionProfile;

/// Design margin applied on top of the raw daily-usage requirement.
pub const BUFFER_FACTOR: f64 = 1.2;
/// Roof area one kW of panels occupies (sq ft).
pub const AREA_PER_KW_SQ_FT: f64 = 20.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Round half-up to `decimals` places. Inputs here are never negative.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Largest system the roof can hold (kW).
pub fn roof_capacity_kw(roof_area_sq_ft: f64) -> f64 {
    roof_area_sq_ft / AREA_PER_KW_SQ_FT
}

/// Required system size in kW, capped by roof area and rounded to one decimal.
///
/// `size = min((monthly_kwh / 30) / sun_hours * 1.2, roof_area / 20)`
///
/// When rounding would push a roof-capped size past the cap, the size is
/// rounded down instead so it always fits the roof.
pub fn compute_system_size(
    monthly_kwh: f64,
    region_key: &str,
    region: &RegionProfile,
    roof_area_sq_ft: f64,
) -> Result<f64, EstimateError> {
    if !(region.sun_hours_per_day > 0.0) {
        return Err(EstimateError::InvalidRegionData {
            region: region_key.to_string(),
            reason: format!("sun_hours_per_day must be > 0, got {}", region.sun_hours_per_day),
        });
    }
    if !(roof_area_sq_ft > 0.0) {
        return Err(EstimateError::invalid_input(format!(
            "roof_area_sq_ft must be > 0, got {roof_area_sq_ft}"
        )));
    }
    if !(monthly_kwh >= 0.0) {
        return Err(EstimateError::invalid_input(format!("monthly_kwh must be >= 0, got {monthly_kwh}")));
    }

    let daily_kwh = monthly_kwh / DAYS_PER_MONTH;
    let raw_size_kw = daily_kwh / region.sun_hours_per_day * BUFFER_FACTOR;
    let cap_kw = roof_capacity_kw(roof_area_sq_ft);
    let size_kw = raw_size_kw.min(cap_kw);

    let mut rounded = round_to(size_kw, 1);
    if rounded > cap_kw {
        rounded = (cap_kw * 10.0).floor() / 10.0;
    }

    tracing::debug!(daily_kwh, raw_size_kw, cap_kw, size_kw = rounded, "system sized");
    Ok(rounded)
}
