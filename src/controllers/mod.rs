pub mod estimate_controller;
pub mod market_controller;
pub mod system_controller;
