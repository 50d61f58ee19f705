use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Region data ─────────────────────────────────────────────────────────────

/// Solar yield and tariff for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionProfile {
    /// Average peak sun hours per day
    pub sun_hours_per_day: f64,
    /// Retail electricity rate (USD/kWh)
    pub electricity_rate_per_kwh: f64,
    /// Installed price quotes, when the region has market data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_price_per_watt: Option<InstalledPricing>,
    /// Representative city used for live weather lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_site: Option<ReferenceSite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InstalledPricing {
    pub residential: f64,
    pub commercial: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceSite {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ─── Cost and content tables ─────────────────────────────────────────────────

/// Fraction of total system cost per component. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComponentCostShares {
    pub panels: f64,
    pub inverters: f64,
    pub mounting: f64,
    pub wiring: f64,
    pub labor: f64,
    pub permits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelContent {
    pub domestic: f64,
    pub foreign: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InverterContent {
    pub string: f64,
    pub micro: f64,
    #[serde(rename = "power-optimizer")]
    pub power_optimizer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MountingContent {
    pub standard: f64,
    pub premium: f64,
}

/// Domestic-content percentage (0..100) per component variant. Labor and
/// permits are fixed at 100 and have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DomesticContentTable {
    pub panels: PanelContent,
    pub inverters: InverterContent,
    pub mounting: MountingContent,
    pub wiring: f64,
}

/// Installed cost per watt keyed by panel origin (USD/W).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostPerWattTable {
    pub domestic: f64,
    pub foreign: f64,
    pub mixed: f64,
}

/// Every static table the engine reads. Built once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceTables {
    pub regions: BTreeMap<String, RegionProfile>,
    /// Used for unknown or absent region keys
    pub default_region: RegionProfile,
    pub cost_shares: ComponentCostShares,
    pub domestic_content: DomesticContentTable,
    pub cost_per_watt: CostPerWattTable,
}

// ─── REST API response types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct RegionLookup {
    /// Resolved key (`default` when the requested key was unknown)
    pub key: String,
    pub is_default: bool,
    pub profile: RegionProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegionCatalog {
    pub regions: BTreeMap<String, RegionProfile>,
    pub default_region: RegionProfile,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceTrend {
    pub component: String,
    pub direction: String,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Incentive {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricingResponse {
    /// Region the prices were taken from
    pub region: String,
    pub pricing: InstalledPricing,
    pub trends: Vec<PriceTrend>,
    pub incentives: Vec<Incentive>,
}
