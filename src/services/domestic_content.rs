//! Domestic vs foreign cost apportionment and Buy America compliance.
//!
//! Percentages are computed on cost *shares* (pre-tariff). Dollar amounts
//! are attached afterwards with [`DomesticContent::price`], once the
//! system cost is known; only those dollar amounts carry the panel tariff.

use std::collections::BTreeMap;

use crate::models::estimate::{
    Component, ComponentContent, DomesticContentResult, InverterType, MountingTier, PanelOrigin,
};
use crate::models::reference::{CostPerWattTable, ReferenceTables};

/// Minimum overall domestic content (percent) for Buy America compliance.
pub const BUY_AMERICA_THRESHOLD_PERCENT: u32 = 55;
/// Share of domestic panels in a mixed panel order.
pub const MIXED_DOMESTIC_FRACTION: f64 = 0.6;
/// Import tariff on foreign panels bought as part of a mixed order.
pub const PANEL_TARIFF_RATE: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSplit {
    pub component: Component,
    pub cost_share: f64,
    pub domestic_percent: f64,
    pub domestic_cost_share: f64,
    pub foreign_cost_share: f64,
    /// Applied to the component's dollar cost only
    pub tariff_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomesticContent {
    /// In `Component::ALL` order
    pub components: Vec<ComponentSplit>,
    pub total_domestic_percent: u32,
    pub total_foreign_percent: u32,
    pub buy_america_compliant: bool,
    pub average_cost_per_watt: f64,
}

pub fn cost_per_watt(table: &CostPerWattTable, origin: PanelOrigin) -> f64 {
    match origin {
        PanelOrigin::Domestic => table.domestic,
        PanelOrigin::Foreign => table.foreign,
        PanelOrigin::Mixed => table.mixed,
    }
}

/// Domestic percentage and tariff multiplier for the panel component.
fn panel_content(tables: &ReferenceTables, origin: PanelOrigin) -> (f64, f64) {
    let panels = &tables.domestic_content.panels;
    match origin {
        PanelOrigin::Domestic => (panels.domestic, 1.0),
        PanelOrigin::Foreign => (panels.foreign, 1.0),
        PanelOrigin::Mixed => {
            let foreign_fraction = 1.0 - MIXED_DOMESTIC_FRACTION;
            let percent = MIXED_DOMESTIC_FRACTION * panels.domestic + foreign_fraction * panels.foreign;
            let tariff_multiplier = MIXED_DOMESTIC_FRACTION + foreign_fraction * (1.0 + PANEL_TARIFF_RATE);
            (percent, tariff_multiplier)
        }
    }
}

pub fn compute_domestic_content(
    tables: &ReferenceTables,
    panel_origin: PanelOrigin,
    inverter_type: InverterType,
    mounting_tier: MountingTier,
) -> DomesticContent {
    let dc = &tables.domestic_content;
    let shares = tables.cost_shares.as_array();

    let components: Vec<ComponentSplit> = Component::ALL
        .iter()
        .zip(shares)
        .map(|(&component, cost_share)| {
            let (domestic_percent, tariff_multiplier) = match component {
                Component::Panels => panel_content(tables, panel_origin),
                Component::Inverters => (
                    match inverter_type {
                        InverterType::StringInverter => dc.inverters.string,
                        InverterType::Micro => dc.inverters.micro,
                        InverterType::PowerOptimizer => dc.inverters.power_optimizer,
                    },
                    1.0,
                ),
                Component::Mounting => (
                    match mounting_tier {
                        MountingTier::Standard => dc.mounting.standard,
                        MountingTier::Premium => dc.mounting.premium,
                    },
                    1.0,
                ),
                Component::Wiring => (dc.wiring, 1.0),
                // always sourced locally
                Component::Labor | Component::Permits => (100.0, 1.0),
            };
            let fraction = domestic_percent / 100.0;
            ComponentSplit {
                component,
                cost_share,
                domestic_percent,
                domestic_cost_share: cost_share * fraction,
                foreign_cost_share: cost_share * (1.0 - fraction),
                tariff_multiplier,
            }
        })
        .collect();

    let share_total: f64 = components.iter().map(|c| c.cost_share).sum();
    let domestic_total: f64 = components.iter().map(|c| c.domestic_cost_share).sum();
    let total_domestic_percent = if share_total > 0.0 {
        (domestic_total / share_total * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };
    let buy_america_compliant = total_domestic_percent >= BUY_AMERICA_THRESHOLD_PERCENT;

    tracing::debug!(
        %panel_origin,
        %inverter_type,
        %mounting_tier,
        total_domestic_percent,
        buy_america_compliant,
        "domestic content apportioned"
    );

    DomesticContent {
        components,
        total_domestic_percent,
        total_foreign_percent: 100 - total_domestic_percent,
        buy_america_compliant,
        average_cost_per_watt: cost_per_watt(&tables.cost_per_watt, panel_origin),
    }
}

impl DomesticContent {
    /// Attach dollar amounts for a system costing `total_cost_usd`.
    /// Callers pass a finite total within `f64`'s exact-integer range, so the
    /// whole-dollar casts below cannot saturate.
    pub fn price(&self, total_cost_usd: f64) -> DomesticContentResult {
        let mut breakdown = BTreeMap::new();
        let mut domestic_usd = 0.0;
        let mut foreign_usd = 0.0;

        for split in &self.components {
            let cost = total_cost_usd * split.cost_share * split.tariff_multiplier;
            let fraction = split.domestic_percent / 100.0;
            let domestic = cost * fraction;
            let foreign = cost * (1.0 - fraction);
            domestic_usd += domestic;
            foreign_usd += foreign;

            breakdown.insert(
                split.component,
                ComponentContent {
                    cost_share: split.cost_share,
                    domestic_percent: split.domestic_percent,
                    cost_usd: cost.round() as i64,
                    domestic_cost_usd: domestic.round() as i64,
                    foreign_cost_usd: foreign.round() as i64,
                },
            );
        }

        DomesticContentResult {
            breakdown,
            total_domestic_percent: self.total_domestic_percent,
            total_foreign_percent: self.total_foreign_percent,
            total_domestic_cost_usd: domestic_usd.round() as i64,
            total_foreign_cost_usd: foreign_usd.round() as i64,
            average_cost_per_watt: self.average_cost_per_watt,
            buy_america_compliant: self.buy_america_compliant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ReferenceTables {
        ReferenceTables::default()
    }

    fn split(content: &DomesticContent, component: Component) -> &ComponentSplit {
        content.components.iter().find(|c| c.component == component).unwrap()
    }

    #[test]
    fn domestic_panels_with_microinverters_comply() {
        // 38 + 11.25 + 6.8 + 4.5 + 25 + 7 = 92.55
        let c = compute_domestic_content(&tables(), PanelOrigin::Domestic, InverterType::Micro, MountingTier::Standard);
        assert_eq!(c.total_domestic_percent, 93);
        assert_eq!(c.total_foreign_percent, 7);
        assert!(c.buy_america_compliant);
        assert_eq!(c.average_cost_per_watt, 4.20);
    }

    #[test]
    fn mixed_panels_blend_sixty_forty() {
        let c = compute_domestic_content(&tables(), PanelOrigin::Mixed, InverterType::StringInverter, MountingTier::Standard);
        let panels = split(&c, Component::Panels);
        assert!((panels.domestic_percent - 59.0).abs() < 1e-9);
        assert!((panels.tariff_multiplier - 1.1).abs() < 1e-12);
        // 23.6 + 6.75 + 6.8 + 4.5 + 25 + 7 = 73.65
        assert_eq!(c.total_domestic_percent, 74);
        assert!(c.buy_america_compliant);
        assert_eq!(c.average_cost_per_watt, 3.65);
    }

    #[test]
    fn foreign_panels_fall_below_threshold() {
        // 2 + 6.75 + 6.8 + 4.5 + 25 + 7 = 52.05
        let c = compute_domestic_content(&tables(), PanelOrigin::Foreign, InverterType::StringInverter, MountingTier::Standard);
        assert_eq!(c.total_domestic_percent, 52);
        assert!(!c.buy_america_compliant);
        assert_eq!(c.average_cost_per_watt, 3.10);
    }

    #[test]
    fn labor_and_permits_are_fully_domestic() {
        let c = compute_domestic_content(&tables(), PanelOrigin::Foreign, InverterType::PowerOptimizer, MountingTier::Premium);
        for component in [Component::Labor, Component::Permits] {
            let s = split(&c, component);
            assert_eq!(s.domestic_percent, 100.0);
            assert_eq!(s.foreign_cost_share, 0.0);
        }
        assert_eq!(split(&c, Component::Mounting).domestic_percent, 70.0);
    }

    #[test]
    fn percentages_always_sum_to_one_hundred() {
        let inverters = [InverterType::StringInverter, InverterType::Micro, InverterType::PowerOptimizer];
        for origin in PanelOrigin::ALL {
            for inverter in inverters {
                for mounting in [MountingTier::Standard, MountingTier::Premium] {
                    let c = compute_domestic_content(&tables(), origin, inverter, mounting);
                    assert_eq!(c.total_domestic_percent + c.total_foreign_percent, 100);
                    assert_eq!(c.buy_america_compliant, c.total_domestic_percent >= 55);
                }
            }
        }
    }

    /// Tables whose only variable share is wiring, so the overall domestic
    /// percentage equals the wiring percentage.
    fn wiring_only_tables(wiring_percent: f64) -> ReferenceTables {
        let mut t = tables();
        t.cost_shares.panels = 0.0;
        t.cost_shares.inverters = 0.0;
        t.cost_shares.mounting = 0.0;
        t.cost_shares.labor = 0.0;
        t.cost_shares.permits = 0.0;
        t.cost_shares.wiring = 1.0;
        t.domestic_content.wiring = wiring_percent;
        t
    }

    #[test]
    fn compliance_boundary_is_inclusive_at_55() {
        for (percent, compliant) in [(54.0, false), (55.0, true), (56.0, true)] {
            let c = compute_domestic_content(
                &wiring_only_tables(percent),
                PanelOrigin::Domestic,
                InverterType::Micro,
                MountingTier::Standard,
            );
            assert_eq!(c.total_domestic_percent, percent as u32);
            assert_eq!(c.buy_america_compliant, compliant, "{percent}%");
        }
    }

    #[test]
    fn priced_breakdown_applies_tariff_to_mixed_panels_only() {
        let c = compute_domestic_content(&tables(), PanelOrigin::Mixed, InverterType::StringInverter, MountingTier::Standard);
        let r = c.price(10_000.0);

        let panels = &r.breakdown[&Component::Panels];
        // 10 000 * 0.40 * 1.1
        assert_eq!(panels.cost_usd, 4_400);
        assert_eq!(panels.domestic_cost_usd, 2_596);
        assert_eq!(panels.foreign_cost_usd, 1_804);

        let inverters = &r.breakdown[&Component::Inverters];
        assert_eq!(inverters.cost_usd, 1_500);
        assert_eq!(inverters.domestic_cost_usd, 675);

        // percentages are untouched by the tariff
        assert_eq!(r.total_domestic_percent, 74);
        assert_eq!(r.total_domestic_cost_usd + r.total_foreign_cost_usd, 10_400);
    }

    #[test]
    fn breakdown_is_ordered_by_component() {
        let c = compute_domestic_content(&tables(), PanelOrigin::Domestic, InverterType::Micro, MountingTier::Standard);
        let keys: Vec<Component> = c.price(1.0).breakdown.keys().copied().collect();
        assert_eq!(keys, Component::ALL.to_vec());
    }
}
