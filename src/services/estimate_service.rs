//! Estimate facade: region lookup → domestic content / cost per watt →
//! sizing → cost and savings, assembled into one [`EstimateResult`].
//!
//! Pure and synchronous. Either a complete result or a typed error.

use crate::error::EstimateError;
use crate::models::estimate::{
    EstimateInput, EstimateResult, PanelOrigin, SourcingComparison, SourcingScenario,
};
use crate::models::reference::ReferenceTables;
use crate::services::cost_savings::{compute_cost_and_savings, PROJECTION_YEARS};
use crate::services::domestic_content::compute_domestic_content;
use crate::services::sizing::{compute_system_size, round_to, AREA_PER_KW_SQ_FT};

/// Rated output of one reference module (kW).
pub const PANEL_RATING_KW: f64 = 0.4;

/// Largest magnitude an `f64` holds exactly as a whole number.
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

/// Round to a whole number, rejecting values a plain cast would saturate.
fn whole(field: &str, value: f64) -> Result<i64, EstimateError> {
    if value.is_finite() && value.abs() <= MAX_EXACT_WHOLE {
        Ok(value.round() as i64)
    } else {
        Err(EstimateError::invalid_input(format!(
            "{field} is out of range ({value}); input magnitudes are too large"
        )))
    }
}

pub fn build_estimate(tables: &ReferenceTables, input: &EstimateInput) -> Result<EstimateResult, EstimateError> {
    input.validate()?;

    // 1. Region
    let region = tables.lookup_region(&input.region);
    if region.is_default && !input.region.is_empty() {
        tracing::debug!(requested = %input.region, "unknown region, using default profile");
    }
    if !(region.profile.electricity_rate_per_kwh > 0.0) {
        return Err(EstimateError::InvalidRegionData {
            region: region.key.to_string(),
            reason: format!(
                "electricity_rate_per_kwh must be > 0, got {}",
                region.profile.electricity_rate_per_kwh
            ),
        });
    }

    // 2. Domestic content and cost per watt
    let content = compute_domestic_content(tables, input.panel_origin, input.inverter_type, input.mounting_tier);

    // 3. Sizing
    let monthly_kwh = input
        .monthly_kwh
        .unwrap_or(input.monthly_bill_usd / region.profile.electricity_rate_per_kwh);
    let system_size_kw = compute_system_size(monthly_kwh, region.key, region.profile, input.roof_area_sq_ft)?;

    // 4. Cost and savings
    let finance = compute_cost_and_savings(
        system_size_kw,
        region.profile,
        content.average_cost_per_watt,
        input.monthly_bill_usd,
    );

    // Half-up rounding must not lift capped savings above the yearly bill.
    let annual_bill_usd = input.monthly_bill_usd * 12.0;
    let annual_savings_usd = whole("annual_savings_usd", finance.annual_savings_usd)?
        .min(annual_bill_usd.floor().min(MAX_EXACT_WHOLE) as i64);
    let estimated_panel_count = u32::try_from(whole(
        "estimated_panel_count",
        (system_size_kw / PANEL_RATING_KW).ceil(),
    )?)
    .map_err(|_| EstimateError::invalid_input(format!("system size {system_size_kw} kW needs too many panels")))?;

    let result = EstimateResult {
        region: region.key.to_string(),
        project_class: input.project_class,
        monthly_kwh,
        system_size_kw,
        cost_per_watt_usd: content.average_cost_per_watt,
        total_cost_usd: whole("total_cost_usd", finance.total_cost_usd)?,
        tax_credit_usd: whole("tax_credit_usd", finance.tax_credit_usd)?,
        estimated_net_cost_usd: whole("estimated_net_cost_usd", finance.net_cost_usd)?,
        annual_production_kwh: whole("annual_production_kwh", finance.annual_production_kwh)?,
        annual_savings_usd,
        payback_years: finance.payback_years,
        twenty_year_savings_usd: whole("twenty_year_savings_usd", finance.multi_year_savings_usd)?,
        co2_reduction_tons_per_year: round_to(finance.co2_tons_per_year, 2),
        co2_reduction_tons_twenty_years: round_to(finance.co2_tons_per_year * f64::from(PROJECTION_YEARS), 2),
        roof_utilization_percent: (system_size_kw * AREA_PER_KW_SQ_FT / input.roof_area_sq_ft * 100.0).round()
            as u32,
        estimated_panel_count,
        domestic_content: content.price(finance.total_cost_usd),
    };

    tracing::debug!(
        region = %result.region,
        system_size_kw,
        net_cost_usd = result.estimated_net_cost_usd,
        domestic_percent = result.domestic_content.total_domestic_percent,
        "estimate built"
    );
    Ok(result)
}

/// Re-run the estimate once per panel origin, all else equal.
pub fn compare_panel_origins(
    tables: &ReferenceTables,
    input: &EstimateInput,
) -> Result<SourcingComparison, EstimateError> {
    let mut scenarios = Vec::with_capacity(PanelOrigin::ALL.len());
    for panel_origin in PanelOrigin::ALL {
        let variant = EstimateInput { panel_origin, ..input.clone() };
        let estimate = build_estimate(tables, &variant)?;
        scenarios.push(SourcingScenario {
            panel_origin,
            cost_per_watt_usd: estimate.cost_per_watt_usd,
            estimated_net_cost_usd: estimate.estimated_net_cost_usd,
            total_domestic_percent: estimate.domestic_content.total_domestic_percent,
            buy_america_compliant: estimate.domestic_content.buy_america_compliant,
        });
    }

    let recommended = scenarios
        .iter()
        .filter(|s| s.buy_america_compliant)
        .min_by_key(|s| s.estimated_net_cost_usd)
        .map(|s| s.panel_origin);

    Ok(SourcingComparison { scenarios, recommended })
}
