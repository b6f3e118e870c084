pub mod harvest_service;
pub mod hh_service;
pub mod store_service;
