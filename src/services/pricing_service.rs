use crate::models::reference::{Incentive, PriceTrend, PricingResponse, ReferenceTables};
use crate::services::cost_savings::TAX_CREDIT_RATE;

pub fn market_trends() -> Vec<PriceTrend> {
    let trend = |component: &str, direction: &str, change_percent: f64| PriceTrend {
        component: component.to_string(),
        direction: direction.to_string(),
        change_percent,
    };
    vec![
        trend("Solar Panels", "down", 5.2),
        trend("Installation", "up", 2.1),
        trend("Permits", "down", 1.5),
    ]
}

pub fn incentives() -> Vec<Incentive> {
    vec![
        Incentive {
            name: "Federal Tax Credit".to_string(),
            description: format!("{:.0}% federal tax credit", TAX_CREDIT_RATE * 100.0),
        },
        Incentive {
            name: "State Rebates".to_string(),
            description: "Varies by state".to_string(),
        },
    ]
}

/// Installed price per watt for `region`. Informational only: the estimate
/// pipeline prices systems by panel origin, not by these quotes.
pub fn regional_pricing(tables: &ReferenceTables, region: &str) -> Option<PricingResponse> {
    let (key, pricing) = tables.installed_pricing(region)?;
    Some(PricingResponse {
        region: key.to_string(),
        pricing: pricing.clone(),
        trends: market_trends(),
        incentives: incentives(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_york_has_its_own_quote() {
        let p = regional_pricing(&ReferenceTables::default(), "new_york").unwrap();
        assert_eq!(p.region, "new-york");
        assert_eq!(p.pricing.residential, 3.85);
        assert_eq!(p.pricing.commercial, 3.25);
    }

    #[test]
    fn unknown_region_uses_california_quote() {
        let p = regional_pricing(&ReferenceTables::default(), "atlantis").unwrap();
        assert_eq!(p.region, "california");
        assert_eq!(p.pricing.residential, 3.45);
    }

    #[test]
    fn incentives_mention_the_federal_rate() {
        assert_eq!(incentives()[0].description, "30% federal tax credit");
        assert_eq!(market_trends().len(), 3);
    }

    #[test]
    fn missing_market_data_yields_none() {
        let mut tables = ReferenceTables::default();
        for profile in tables.regions.values_mut() {
            profile.installed_price_per_watt = None;
        }
        assert!(regional_pricing(&tables, "texas").is_none());
    }
}
