//! Built-in reference data and region lookup.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::models::reference::{
    ComponentCostShares, CostPerWattTable, DomesticContentTable, InstalledPricing, InverterContent,
    MountingContent, PanelContent, ReferenceSite, ReferenceTables, RegionProfile,
};

/// Key reported when a lookup falls back to the default profile.
pub const DEFAULT_REGION_KEY: &str = "default";

/// Region used for pricing and weather when the requested one has no data.
pub const FALLBACK_MARKET_REGION: &str = "california";

const SHARE_SUM_TOLERANCE: f64 = 1e-6;

/// Result of a region lookup. Never fails: unknown keys resolve to the
/// default profile.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRegion<'a> {
    pub key: &'a str,
    pub profile: &'a RegionProfile,
    pub is_default: bool,
}

/// Canonical form of a region key: trimmed, lowercase, `_` and spaces as `-`.
pub fn normalize_region_key(key: &str) -> String {
    key.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

impl ReferenceTables {
    pub fn lookup_region(&self, key: &str) -> ResolvedRegion<'_> {
        let normalized = normalize_region_key(key);
        match self.regions.get_key_value(normalized.as_str()) {
            Some((k, profile)) => ResolvedRegion { key: k.as_str(), profile, is_default: false },
            None => ResolvedRegion {
                key: DEFAULT_REGION_KEY,
                profile: &self.default_region,
                is_default: true,
            },
        }
    }

    /// Installed pricing for `key`, falling back to the market fallback
    /// region. Returns the region the prices came from.
    pub fn installed_pricing(&self, key: &str) -> Option<(&str, &InstalledPricing)> {
        let resolved = self.lookup_region(key);
        if let Some(pricing) = &resolved.profile.installed_price_per_watt {
            return Some((resolved.key, pricing));
        }
        self.regions
            .get_key_value(FALLBACK_MARKET_REGION)
            .and_then(|(k, p)| p.installed_price_per_watt.as_ref().map(|pricing| (k.as_str(), pricing)))
    }

    /// Weather reference site for `key`, with the same fallback as pricing.
    pub fn reference_site(&self, key: &str) -> Option<(&str, &ReferenceSite)> {
        let resolved = self.lookup_region(key);
        if let Some(site) = &resolved.profile.reference_site {
            return Some((resolved.key, site));
        }
        self.regions
            .get_key_value(FALLBACK_MARKET_REGION)
            .and_then(|(k, p)| p.reference_site.as_ref().map(|site| (k.as_str(), site)))
    }

    /// Consistency checks run once when the tables are loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidReferenceData(msg));

        let profiles = self
            .regions
            .iter()
            .map(|(k, p)| (k.as_str(), p))
            .chain(std::iter::once((DEFAULT_REGION_KEY, &self.default_region)));
        for (key, profile) in profiles {
            if normalize_region_key(key) != key {
                return invalid(format!("region key '{key}' is not normalized"));
            }
            if !(profile.sun_hours_per_day > 0.0) {
                return invalid(format!("region '{key}': sun_hours_per_day must be > 0"));
            }
            if !(profile.electricity_rate_per_kwh > 0.0) {
                return invalid(format!("region '{key}': electricity_rate_per_kwh must be > 0"));
            }
        }

        let shares = self.cost_shares.as_array();
        if shares.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return invalid("component cost shares must each be within [0, 1]".into());
        }
        let sum: f64 = shares.iter().sum();
        if (sum - 1.0).abs() > SHARE_SUM_TOLERANCE {
            return invalid(format!("component cost shares sum to {sum}, expected 1.0"));
        }

        let dc = &self.domestic_content;
        let percents = [
            dc.panels.domestic,
            dc.panels.foreign,
            dc.inverters.string,
            dc.inverters.micro,
            dc.inverters.power_optimizer,
            dc.mounting.standard,
            dc.mounting.premium,
            dc.wiring,
        ];
        if percents.iter().any(|p| !(0.0..=100.0).contains(p)) {
            return invalid("domestic-content percentages must be within [0, 100]".into());
        }

        let cpw = &self.cost_per_watt;
        if [cpw.domestic, cpw.foreign, cpw.mixed].iter().any(|c| !(*c > 0.0)) {
            return invalid("cost per watt must be > 0 for every panel origin".into());
        }

        Ok(())
    }
}

impl ComponentCostShares {
    /// Shares in `Component::ALL` order.
    pub fn as_array(&self) -> [f64; 6] {
        [self.panels, self.inverters, self.mounting, self.wiring, self.labor, self.permits]
    }
}

fn region(sun_hours: f64, rate: f64) -> RegionProfile {
    RegionProfile {
        sun_hours_per_day: sun_hours,
        electricity_rate_per_kwh: rate,
        installed_price_per_watt: None,
        reference_site: None,
    }
}

fn site(city: &str, latitude: f64, longitude: f64) -> Option<ReferenceSite> {
    Some(ReferenceSite { city: city.to_string(), latitude, longitude })
}

fn pricing(residential: f64, commercial: f64) -> Option<InstalledPricing> {
    Some(InstalledPricing { residential, commercial })
}

impl Default for ReferenceTables {
    fn default() -> Self {
        let mut regions = BTreeMap::new();
        regions.insert(
            "california".to_string(),
            RegionProfile {
                installed_price_per_watt: pricing(3.45, 3.05),
                reference_site: site("Los Angeles", 34.0522, -118.2437),
                ..region(5.5, 0.28)
            },
        );
        regions.insert(
            "texas".to_string(),
            RegionProfile {
                installed_price_per_watt: pricing(2.95, 2.55),
                reference_site: site("Houston", 29.7604, -95.3698),
                ..region(4.8, 0.12)
            },
        );
        regions.insert(
            "florida".to_string(),
            RegionProfile {
                installed_price_per_watt: pricing(3.15, 2.75),
                reference_site: site("Miami", 25.7617, -80.1918),
                ..region(4.5, 0.13)
            },
        );
        regions.insert(
            "arizona".to_string(),
            RegionProfile { reference_site: site("Phoenix", 33.4484, -112.0740), ..region(6.0, 0.13) },
        );
        regions.insert(
            "nevada".to_string(),
            RegionProfile { reference_site: site("Las Vegas", 36.1699, -115.1398), ..region(5.8, 0.14) },
        );
        regions.insert(
            "colorado".to_string(),
            RegionProfile { reference_site: site("Denver", 39.7392, -104.9903), ..region(5.0, 0.13) },
        );
        regions.insert(
            "north-carolina".to_string(),
            RegionProfile { reference_site: site("Raleigh", 35.7796, -78.6382), ..region(4.7, 0.11) },
        );
        regions.insert(
            "new-york".to_string(),
            RegionProfile {
                installed_price_per_watt: pricing(3.85, 3.25),
                reference_site: site("New York", 40.7128, -74.0060),
                ..region(3.8, 0.18)
            },
        );

        Self {
            regions,
            default_region: region(4.5, 0.13),
            cost_shares: ComponentCostShares {
                panels: 0.40,
                inverters: 0.15,
                mounting: 0.08,
                wiring: 0.05,
                labor: 0.25,
                permits: 0.07,
            },
            domestic_content: DomesticContentTable {
                panels: PanelContent { domestic: 95.0, foreign: 5.0 },
                inverters: InverterContent { string: 45.0, micro: 75.0, power_optimizer: 40.0 },
                mounting: MountingContent { standard: 85.0, premium: 70.0 },
                wiring: 90.0,
            },
            cost_per_watt: CostPerWattTable { domestic: 4.20, foreign: 3.10, mixed: 3.65 },
        }
    }
}
