pub mod cost_savings;
pub mod domestic_content;
pub mod estimate_service;
pub mod pricing_service;
pub mod reference_tables;
pub mod sizing;
pub mod weather_service;
