use utoipa::OpenApi;
use crate::controllers::{estimate_controller, market_controller, system_controller};
use crate::models::{estimate, reference, system, weather};

#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_controller::create_estimate,
        estimate_controller::compare_estimate,
        estimate_controller::list_regions,
        estimate_controller::get_region,
        market_controller::get_pricing,
        market_controller::get_installation_conditions,
        system_controller::get_health,
        system_controller::get_offline_mode,
        system_controller::set_offline_mode
    ),
    components(
        schemas(
            estimate::EstimateRequest,
            estimate::EstimateResponse,
            estimate::EstimateResult,
            estimate::DomesticContentResult,
            estimate::ComponentContent,
            estimate::Component,
            estimate::PanelOrigin,
            estimate::InverterType,
            estimate::MountingTier,
            estimate::ProjectClass,
            estimate::SourcingScenario,
            estimate::SourcingComparison,
            reference::RegionProfile,
            reference::RegionLookup,
            reference::RegionCatalog,
            reference::InstalledPricing,
            reference::ReferenceSite,
            reference::PricingResponse,
            reference::PriceTrend,
            reference::Incentive,
            weather::CurrentConditions,
            weather::InstallationAssessment,
            weather::Recommendation,
            weather::InstallationConditionsResponse,
            system::HealthStatus,
            system::OfflineModeSetting
        )
    ),
    tags(
        (name = "solar-estimator", description = "Residential solar estimate and domestic content API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/estimate",
            "/api/estimate/compare",
            "/api/regions",
            "/api/regions/{key}",
            "/api/pricing",
            "/api/installation-conditions",
            "/api/health",
            "/api/settings/offline-mode",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
