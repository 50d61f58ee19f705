pub mod estimate;
pub mod reference;
pub mod system;
pub mod weather;
