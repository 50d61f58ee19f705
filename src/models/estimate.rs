use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EstimateError;

// ─── Categorical inputs ──────────────────────────────────────────────────────

/// Implements `as_str`, `Display` and a strict `FromStr` for a categorical
/// input. Unknown strings are rejected with `InvalidInput`.
macro_rules! categorical {
    ($ty:ident, $field:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = EstimateError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(EstimateError::invalid_input(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $field,
                        other,
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PanelOrigin {
    Domestic,
    Foreign,
    Mixed,
}

impl PanelOrigin {
    pub const ALL: [PanelOrigin; 3] = [PanelOrigin::Domestic, PanelOrigin::Foreign, PanelOrigin::Mixed];
}

categorical!(PanelOrigin, "panel_origin", {
    Domestic => "domestic",
    Foreign => "foreign",
    Mixed => "mixed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum InverterType {
    #[serde(rename = "string")]
    StringInverter,
    #[serde(rename = "micro")]
    Micro,
    #[serde(rename = "power-optimizer")]
    PowerOptimizer,
}

categorical!(InverterType, "inverter_type", {
    StringInverter => "string",
    Micro => "micro",
    PowerOptimizer => "power-optimizer",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MountingTier {
    #[default]
    Standard,
    Premium,
}

categorical!(MountingTier, "mounting_tier", {
    Standard => "standard",
    Premium => "premium",
});

/// Recorded and echoed back; never enters the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectClass {
    #[default]
    Residential,
    Commercial,
}

categorical!(ProjectClass, "project_class", {
    Residential => "residential",
    Commercial => "commercial",
});

/// Cost components of an installed system, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Panels,
    Inverters,
    Mounting,
    Wiring,
    Labor,
    Permits,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Panels,
        Component::Inverters,
        Component::Mounting,
        Component::Wiring,
        Component::Labor,
        Component::Permits,
    ];
}

// ─── Request / validated input ───────────────────────────────────────────────

/// Raw estimate request as it arrives on the wire. Every field is optional
/// here; presence and categorical values are checked once when converting
/// into [`EstimateInput`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct EstimateRequest {
    /// Current monthly electricity bill (USD, > 0)
    pub monthly_bill_usd: Option<f64>,
    /// Monthly consumption (kWh, > 0). Derived from bill ÷ regional rate when absent.
    pub monthly_kwh: Option<f64>,
    /// Region key, e.g. `california`. Unknown or absent keys use the default profile.
    pub region: Option<String>,
    /// Usable roof area (sq ft, > 0)
    pub roof_area_sq_ft: Option<f64>,
    /// `domestic`, `foreign` or `mixed`
    pub panel_origin: Option<String>,
    /// `string`, `micro` or `power-optimizer`
    pub inverter_type: Option<String>,
    /// `standard` (default) or `premium`
    pub mounting_tier: Option<String>,
    /// `residential` (default) or `commercial`
    pub project_class: Option<String>,
}

/// Strongly typed estimate input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimateInput {
    pub monthly_bill_usd: f64,
    pub monthly_kwh: Option<f64>,
    pub region: String,
    pub roof_area_sq_ft: f64,
    pub panel_origin: PanelOrigin,
    pub inverter_type: InverterType,
    #[serde(default)]
    pub mounting_tier: MountingTier,
    #[serde(default)]
    pub project_class: ProjectClass,
}

impl EstimateInput {
    /// Numeric preconditions of the pipeline. Checked once by
    /// `build_estimate` before any stage runs.
    pub fn validate(&self) -> Result<(), EstimateError> {
        require_positive("monthly_bill_usd", self.monthly_bill_usd)?;
        require_positive("roof_area_sq_ft", self.roof_area_sq_ft)?;
        if let Some(kwh) = self.monthly_kwh {
            require_positive("monthly_kwh", kwh)?;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::invalid_input(format!("{field} must be a finite number > 0, got {value}")))
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, EstimateError> {
    value.ok_or_else(|| EstimateError::invalid_input(format!("{field} is required")))
}

impl TryFrom<EstimateRequest> for EstimateInput {
    type Error = EstimateError;

    fn try_from(req: EstimateRequest) -> Result<Self, Self::Error> {
        let panel_origin = required("panel_origin", req.panel_origin.as_deref())?.parse()?;
        let inverter_type = required("inverter_type", req.inverter_type.as_deref())?.parse()?;
        let mounting_tier = match req.mounting_tier.as_deref() {
            Some(s) => s.parse()?,
            None => MountingTier::default(),
        };
        let project_class = match req.project_class.as_deref() {
            Some(s) => s.parse()?,
            None => ProjectClass::default(),
        };

        Ok(Self {
            monthly_bill_usd: required("monthly_bill_usd", req.monthly_bill_usd)?,
            monthly_kwh: req.monthly_kwh,
            region: req.region.unwrap_or_default(),
            roof_area_sq_ft: required("roof_area_sq_ft", req.roof_area_sq_ft)?,
            panel_origin,
            inverter_type,
            mounting_tier,
            project_class,
        })
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Per-component slice of the domestic-content split.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComponentContent {
    /// Fraction of total system cost (0..1)
    pub cost_share: f64,
    /// Domestic content of the selected variant (0..100)
    pub domestic_percent: f64,
    /// Component cost in USD, tariff included
    pub cost_usd: i64,
    pub domestic_cost_usd: i64,
    pub foreign_cost_usd: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DomesticContentResult {
    pub breakdown: BTreeMap<Component, ComponentContent>,
    pub total_domestic_percent: u32,
    pub total_foreign_percent: u32,
    pub total_domestic_cost_usd: i64,
    pub total_foreign_cost_usd: i64,
    pub average_cost_per_watt: f64,
    /// `total_domestic_percent >= 55`
    pub buy_america_compliant: bool,
}

/// Complete estimate. Money is rounded to whole dollars only here, at the
/// output boundary.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EstimateResult {
    /// Resolved region key (`default` when the requested key was unknown)
    pub region: String,
    pub project_class: ProjectClass,
    pub monthly_kwh: f64,
    pub system_size_kw: f64,
    pub cost_per_watt_usd: f64,
    pub total_cost_usd: i64,
    pub tax_credit_usd: i64,
    pub estimated_net_cost_usd: i64,
    pub annual_production_kwh: i64,
    pub annual_savings_usd: i64,
    /// Absent when the system produces no savings
    pub payback_years: Option<f64>,
    pub twenty_year_savings_usd: i64,
    pub co2_reduction_tons_per_year: f64,
    pub co2_reduction_tons_twenty_years: f64,
    pub roof_utilization_percent: u32,
    pub estimated_panel_count: u32,
    pub domestic_content: DomesticContentResult,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    pub timestamp: DateTime<Utc>,
    pub estimate: EstimateResult,
}

/// One panel-origin alternative for the same site and usage.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SourcingScenario {
    pub panel_origin: PanelOrigin,
    pub cost_per_watt_usd: f64,
    pub estimated_net_cost_usd: i64,
    pub total_domestic_percent: u32,
    pub buy_america_compliant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SourcingComparison {
    pub scenarios: Vec<SourcingScenario>,
    /// Cheapest compliant origin, if any origin complies
    pub recommended: Option<PanelOrigin>,
}
