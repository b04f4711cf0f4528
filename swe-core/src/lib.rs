pub mod date_range;
pub mod error;
pub mod frame;
pub mod region;
pub mod site;
pub mod store;
pub mod water_year;
