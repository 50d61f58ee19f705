use crate::models::reference::RegionProfile;
use crate::services::sizing::round_to;

/// Federal incentive as a fraction of total installed cost.
pub const TAX_CREDIT_RATE: f64 = 0.30;
/// Sizing already carries the 1.2 design margin, so production is not
/// discounted a second time.
pub const PRODUCTION_EFFICIENCY: f64 = 1.0;
pub const RATE_ESCALATION: f64 = 0.03;
pub const PROJECTION_YEARS: u32 = 20;
/// Average grid mix (t CO2 per kWh).
pub const CO2_TONS_PER_KWH: f64 = 0.0007;

/// Unrounded financial figures. Rounding happens when the estimate is
/// assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAndSavings {
    pub total_cost_usd: f64,
    pub tax_credit_usd: f64,
    pub net_cost_usd: f64,
    pub annual_production_kwh: f64,
    pub annual_savings_usd: f64,
    /// One decimal; `None` when there are no savings to pay the system back
    pub payback_years: Option<f64>,
    pub multi_year_savings_usd: f64,
    pub co2_tons_per_year: f64,
}

pub fn compute_cost_and_savings(
    system_size_kw: f64,
    region: &RegionProfile,
    cost_per_watt: f64,
    monthly_bill_usd: f64,
) -> CostAndSavings {
    let total_cost_usd = system_size_kw * 1000.0 * cost_per_watt;
    let tax_credit_usd = total_cost_usd * TAX_CREDIT_RATE;
    let net_cost_usd = total_cost_usd - tax_credit_usd;

    let annual_production_kwh = system_size_kw * region.sun_hours_per_day * 365.0 * PRODUCTION_EFFICIENCY;
    // Savings cannot exceed what the customer pays today.
    let annual_savings_usd =
        (annual_production_kwh * region.electricity_rate_per_kwh).min(monthly_bill_usd * 12.0);

    let payback_years = if annual_savings_usd > 0.0 {
        Some(round_to(net_cost_usd / annual_savings_usd, 1))
    } else {
        None
    };

    let multi_year_savings_usd = projected_savings(
        annual_production_kwh,
        region.electricity_rate_per_kwh,
        PROJECTION_YEARS,
    ) - net_cost_usd;

    CostAndSavings {
        total_cost_usd,
        tax_credit_usd,
        net_cost_usd,
        annual_production_kwh,
        annual_savings_usd,
        payback_years,
        multi_year_savings_usd,
        co2_tons_per_year: annual_production_kwh * CO2_TONS_PER_KWH,
    }
}

/// Gross savings over `years`, escalating the rate before each year.
pub fn projected_savings(annual_production_kwh: f64, base_rate_per_kwh: f64, years: u32) -> f64 {
    let mut rate = base_rate_per_kwh;
    let mut total = 0.0;
    for _ in 0..years {
        rate *= 1.0 + RATE_ESCALATION;
        total += annual_production_kwh * rate;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(sun_hours: f64, rate: f64) -> RegionProfile {
        RegionProfile {
            sun_hours_per_day: sun_hours,
            electricity_rate_per_kwh: rate,
            installed_price_per_watt: None,
            reference_site: None,
        }
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn costs_apply_thirty_percent_credit() {
        let r = compute_cost_and_savings(6.5, &region(5.5, 0.28), 3.65, 150.0);
        assert!(close(r.total_cost_usd, 23_725.0, 1e-6));
        assert!(close(r.tax_credit_usd, 7_117.5, 1e-6));
        assert!(close(r.net_cost_usd, 16_607.5, 1e-6));
    }

    #[test]
    fn production_is_not_discounted_twice() {
        let r = compute_cost_and_savings(6.5, &region(5.5, 0.28), 3.65, 150.0);
        assert!(close(r.annual_production_kwh, 6.5 * 5.5 * 365.0, 1e-9));
    }

    #[test]
    fn savings_are_capped_at_current_annual_bill() {
        // capacity 13 048.75 kWh * 0.28 = 3 653.65 USD, but the bill is 1 800 USD/yr
        let r = compute_cost_and_savings(6.5, &region(5.5, 0.28), 3.65, 150.0);
        assert_eq!(r.annual_savings_usd, 1_800.0);
        assert_eq!(r.payback_years, Some(9.2));
    }

    #[test]
    fn uncapped_savings_use_regional_rate() {
        let r = compute_cost_and_savings(2.0, &region(4.8, 0.12), 3.10, 500.0);
        assert!(close(r.annual_savings_usd, 2.0 * 4.8 * 365.0 * 0.12, 1e-9));
    }

    #[test]
    fn zero_size_has_no_payback() {
        let r = compute_cost_and_savings(0.0, &region(5.5, 0.28), 3.65, 150.0);
        assert_eq!(r.annual_savings_usd, 0.0);
        assert_eq!(r.payback_years, None);
    }

    #[test]
    fn twenty_year_projection_escalates_three_percent() {
        let production = 13_048.75;
        let rate = 0.28;
        let growth = 1.03_f64;
        let closed_form = production * rate * growth * (growth.powi(20) - 1.0) / (growth - 1.0);
        assert!(close(projected_savings(production, rate, 20), closed_form, 1e-6));

        let r = compute_cost_and_savings(6.5, &region(5.5, 0.28), 3.65, 150.0);
        assert!(close(r.multi_year_savings_usd, closed_form - 16_607.5, 1e-6));
    }

    #[test]
    fn first_projected_year_already_escalated() {
        assert!(close(projected_savings(1_000.0, 0.10, 1), 103.0, 1e-9));
        assert_eq!(projected_savings(1_000.0, 0.10, 0), 0.0);
    }

    #[test]
    fn co2_follows_production() {
        let r = compute_cost_and_savings(10.0, &region(5.0, 0.13), 4.20, 300.0);
        assert!(close(r.co2_tons_per_year, 18_250.0 * 0.0007, 1e-9));
    }
}
